//! Resolution of Go import paths to package directories
//!
//! Direct resolution looks in GOROOT, the enclosing Go module and every
//! GOPATH entry. When that fails, `vendor` directories are tried from the
//! destination package's directory up to the filesystem root.

mod context;
pub mod files;
mod module;

pub use context::{BuildContext, go_env_goroot, host_goarch, host_goos};
pub use module::{GoModule, parse_module_path};

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// A resolved package: its directory and the files that build it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub dir: PathBuf,
    pub import_path: String,
    pub files: Vec<PathBuf>,
}

/// Turns import paths into packages
pub trait PackageLocator {
    /// Resolve `import_path`; an empty path is the destination package itself
    fn resolve(&self, import_path: &str) -> Result<Package>;

    /// Import path the destination package is known by
    fn destination_import_path(&self) -> String;
}

/// Locator over a GOROOT/GOPATH/module layout on disk
#[derive(Debug, Clone)]
pub struct GoLocator {
    context: BuildContext,
    module: Option<GoModule>,
}

impl GoLocator {
    pub fn new(context: BuildContext) -> Self {
        let module = GoModule::find(&context.working_dir);
        Self { context, module }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn module(&self) -> Option<&GoModule> {
        self.module.as_ref()
    }

    /// Import path of a directory: GOROOT/GOPATH relative, module relative,
    /// or the `_/abs/dir` form of a package outside both
    pub fn import_path_for_dir(&self, dir: &Path) -> String {
        for src in self.context.source_roots() {
            if let Ok(rel) = dir.strip_prefix(&src) {
                let rel = slash_path(rel);
                if !rel.is_empty() {
                    return rel;
                }
            }
        }
        if let Some(path) = self.module.as_ref().and_then(|m| m.import_path_for(dir)) {
            return path;
        }
        format!("_/{}", slash_path(dir))
    }

    /// Directories tried before the vendor fallback, in order
    fn direct_candidates(&self, import_path: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(goroot) = &self.context.goroot {
            candidates.push(join_import_path(&goroot.join("src"), import_path));
        }
        if let Some(dir) = self.module.as_ref().and_then(|m| m.dir_for(import_path)) {
            candidates.push(dir);
        }
        for gopath in &self.context.gopath {
            candidates.push(join_import_path(&gopath.join("src"), import_path));
        }
        candidates
    }

    /// `<ancestor>/vendor/<import_path>` from the working directory upward
    fn vendor_candidates(&self, import_path: &str) -> Vec<PathBuf> {
        self.context
            .working_dir
            .ancestors()
            .map(|ancestor| join_import_path(&ancestor.join("vendor"), import_path))
            .collect()
    }

    fn try_dir(&self, dir: &Path, import_path: &str) -> Result<Option<Package>> {
        if !dir.is_dir() {
            debug!("No directory at {}", dir.display());
            return Ok(None);
        }
        let files = files::list_go_files(dir, &self.context)?;
        if files.is_empty() {
            debug!("No buildable Go files in {}", dir.display());
            return Ok(None);
        }
        Ok(Some(Package {
            dir: dir.to_path_buf(),
            import_path: import_path.to_string(),
            files,
        }))
    }

    fn found(&self, package: Package) -> Result<Package> {
        info!(
            "Resolved package {:?} to {} ({} files)",
            package.import_path,
            package.dir.display(),
            package.files.len()
        );
        Ok(package)
    }
}

impl PackageLocator for GoLocator {
    fn resolve(&self, import_path: &str) -> Result<Package> {
        if import_path.is_empty() {
            let dir = self.context.working_dir.clone();
            let path = self.import_path_for_dir(&dir);
            return match self.try_dir(&dir, &path)? {
                Some(package) => self.found(package),
                None => Err(Error::PackageNotFound {
                    import_path: path,
                    searched: 1,
                }),
            };
        }

        if is_relative_import(import_path) {
            let dir = context::canonical(&self.context.working_dir.join(import_path));
            let path = self.import_path_for_dir(&dir);
            return match self.try_dir(&dir, &path)? {
                Some(package) => self.found(package),
                None => Err(Error::PackageNotFound {
                    import_path: import_path.to_string(),
                    searched: 1,
                }),
            };
        }

        let mut searched = 0;
        for dir in self.direct_candidates(import_path) {
            searched += 1;
            if let Some(package) = self.try_dir(&dir, import_path)? {
                return self.found(package);
            }
        }

        debug!("Direct resolution of {import_path:?} failed, trying vendor directories");
        for dir in self.vendor_candidates(import_path) {
            searched += 1;
            if let Some(package) = self.try_dir(&dir, import_path)? {
                return self.found(package);
            }
        }

        Err(Error::PackageNotFound {
            import_path: import_path.to_string(),
            searched,
        })
    }

    fn destination_import_path(&self) -> String {
        self.import_path_for_dir(&self.context.working_dir)
    }
}

fn is_relative_import(import_path: &str) -> bool {
    import_path == "." || import_path.starts_with("./") || import_path.starts_with("../")
}

/// Join a slash-separated import path onto a directory
pub(crate) fn join_import_path(base: &Path, import_path: &str) -> PathBuf {
    import_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Slash-separated rendering of a path's normal components
pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
