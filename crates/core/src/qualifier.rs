//! Package qualification relative to the destination package
//!
//! Every named type that is rendered into generated code goes through a
//! [`Qualifier`], which decides whether the type's package must be spelled
//! out (`http.Request`) or can be dropped (`Request`).

use crate::types::PackageIdentity;
use tracing::trace;

/// Decides type prefixes for code that will live in one destination package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    destination: PackageIdentity,
}

impl Qualifier {
    pub fn new(destination: PackageIdentity) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> &PackageIdentity {
        &self.destination
    }

    /// A foreign package is treated as the destination when either its import
    /// path or its display name matches. The name check keeps a package whose
    /// name was overridden (test-package mode) from qualifying itself.
    pub fn is_destination(&self, foreign: &PackageIdentity) -> bool {
        foreign.import_path == self.destination.import_path
            || foreign.name == self.destination.name
    }

    /// Prefix to print before types of `foreign`; empty when none is needed
    pub fn qualify<'a>(&self, foreign: &'a PackageIdentity) -> &'a str {
        let same = self.is_destination(foreign);
        trace!(
            destination = %self.destination.import_path,
            foreign = %foreign.import_path,
            same,
            "qualify"
        );
        if same { "" } else { &foreign.name }
    }

    /// `pkg.Name` or `Name`, depending on [`Qualifier::qualify`]
    pub fn type_name(&self, package: &PackageIdentity, name: &str) -> String {
        match self.qualify(package) {
            "" => name.to_string(),
            prefix => format!("{prefix}.{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> PackageIdentity {
        PackageIdentity::new("example.com/app/store", "store")
    }

    #[test]
    fn test_same_import_path_is_unqualified() {
        let q = Qualifier::new(destination());
        let pkg = PackageIdentity::new("example.com/app/store", "store");
        assert_eq!(q.qualify(&pkg), "");
        assert_eq!(q.type_name(&pkg, "Item"), "Item");
    }

    #[test]
    fn test_foreign_package_uses_its_name() {
        let q = Qualifier::new(destination());
        let http = PackageIdentity::new("net/http", "http");
        assert_eq!(q.qualify(&http), "http");
        assert_eq!(q.type_name(&http, "Request"), "http.Request");
    }

    #[test]
    fn test_same_display_name_is_unqualified() {
        let q = Qualifier::new(destination().test_variant());
        let other = PackageIdentity::new("example.com/other", "store_test");
        assert_eq!(q.qualify(&other), "");
    }

    #[test]
    fn test_test_variant_keeps_own_path_unqualified() {
        let q = Qualifier::new(destination().test_variant());
        assert_eq!(q.qualify(&destination()), "");
    }

    #[test]
    fn test_qualification_is_idempotent() {
        let q = Qualifier::new(destination());
        let own = destination();
        let once = q.type_name(&own, "Item");
        let twice = q.type_name(&own, &once);
        assert_eq!(once, "Item");
        assert_eq!(twice, "Item");
    }

    #[test]
    fn test_decisions_are_stable() {
        let q = Qualifier::new(destination());
        let io = PackageIdentity::new("io", "io");
        let first = q.qualify(&io).to_string();
        for _ in 0..3 {
            assert_eq!(q.qualify(&io), first);
        }
        assert_eq!(q.clone().qualify(&io), first);
    }
}
