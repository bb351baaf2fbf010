use crate::{locator::PackageLocator, parser::GoParser, parser::SourceFile, types::PackageIdentity};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;

/// Real package names of import paths, looked up once per path
pub struct PackageNames<'a> {
    locator: Option<&'a dyn PackageLocator>,
    cache: RefCell<HashMap<String, String>>,
}

impl<'a> PackageNames<'a> {
    pub fn new(locator: &'a dyn PackageLocator) -> Self {
        Self {
            locator: Some(locator),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Names derived from import paths only
    pub fn offline() -> Self {
        Self {
            locator: None,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Record a package whose name is already known
    pub fn remember(&self, package: &PackageIdentity) {
        self.cache
            .borrow_mut()
            .insert(package.import_path.clone(), package.name.clone());
    }

    pub fn name_of(&self, import_path: &str) -> String {
        if let Some(name) = self.cache.borrow().get(import_path) {
            return name.clone();
        }
        let name = self
            .read_package_clause(import_path)
            .unwrap_or_else(|| guess_package_name(import_path));
        debug!("Package name of {import_path:?} is {name}");
        self.cache
            .borrow_mut()
            .insert(import_path.to_string(), name.clone());
        name
    }

    pub fn identity(&self, import_path: &str) -> PackageIdentity {
        PackageIdentity::new(import_path, self.name_of(import_path))
    }

    fn read_package_clause(&self, import_path: &str) -> Option<String> {
        let package = self.locator?.resolve(import_path).ok()?;
        let first = package.files.first()?;
        let mut parser = GoParser::new().ok()?;
        let file = SourceFile::load(&mut parser, first).ok()?;
        file.package_name().map(str::to_string)
    }
}

/// Name a package is assumed to have from its import path alone: the last
/// segment, skipping a `vN` major version segment, without a `go-` prefix
/// and cut at the first character that cannot appear in an identifier
pub fn guess_package_name(import_path: &str) -> String {
    let mut segments = import_path.rsplit('/').filter(|s| !s.is_empty());
    let mut base = segments.next().unwrap_or(import_path);
    if is_major_version(base) {
        if let Some(parent) = segments.next() {
            base = parent;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    let end = base
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(base.len());
    base[..end].to_string()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}
