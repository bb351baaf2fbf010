use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The Go module enclosing the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Directory holding `go.mod`
    pub root: PathBuf,
    /// Module path from the `module` directive
    pub path: String,
}

impl GoModule {
    /// Find the nearest `go.mod` at or above `start`
    pub fn find(start: &Path) -> Option<Self> {
        for dir in start.ancestors() {
            let go_mod = dir.join("go.mod");
            if !go_mod.is_file() {
                continue;
            }
            let contents = match std::fs::read_to_string(&go_mod) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("Cannot read {}: {e}", go_mod.display());
                    return None;
                }
            };
            return match parse_module_path(&contents) {
                Some(path) => {
                    debug!("Found module {path} at {}", dir.display());
                    Some(Self {
                        root: dir.to_path_buf(),
                        path,
                    })
                }
                None => {
                    warn!("{} has no module directive", go_mod.display());
                    None
                }
            };
        }
        None
    }

    /// Directory of `import_path` when it belongs to this module
    pub fn dir_for(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rest = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(super::join_import_path(&self.root, rest))
    }

    /// Import path of `dir` when it lies inside this module
    pub fn import_path_for(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let rel = super::slash_path(rel);
        if rel.is_empty() {
            Some(self.path.clone())
        } else {
            Some(format!("{}/{rel}", self.path))
        }
    }
}

/// Module path declared in a `go.mod` file
pub fn parse_module_path(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
            return None;
        }
        let path = rest.trim().trim_matches(|c| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_module_path() {
        let go_mod = "// header\nmodule example.com/app // trailing\n\ngo 1.22\n";
        assert_eq!(parse_module_path(go_mod).as_deref(), Some("example.com/app"));
        assert_eq!(
            parse_module_path("module \"example.com/quoted\"\n").as_deref(),
            Some("example.com/quoted")
        );
        assert_eq!(parse_module_path("modulex foo\ngo 1.21\n"), None);
        assert_eq!(parse_module_path("go 1.21\n"), None);
    }

    #[test]
    fn test_find_and_map_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let nested = root.join("internal").join("store");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();

        let module = GoModule::find(&nested).unwrap();
        assert_eq!(module.root, root);
        assert_eq!(module.path, "example.com/app");

        assert_eq!(module.dir_for("example.com/app"), Some(root.clone()));
        assert_eq!(module.dir_for("example.com/app/internal/store"), Some(nested.clone()));
        assert_eq!(module.dir_for("example.com/application"), None);
        assert_eq!(module.dir_for("net/http"), None);

        assert_eq!(
            module.import_path_for(&nested).as_deref(),
            Some("example.com/app/internal/store")
        );
        assert_eq!(module.import_path_for(&root).as_deref(), Some("example.com/app"));
    }
}
