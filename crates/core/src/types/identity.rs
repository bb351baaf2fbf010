use serde::{Deserialize, Serialize};

/// Suffix Go gives to the external test variant of a package
pub const TEST_PACKAGE_SUFFIX: &str = "_test";

/// Identity of a Go package: where it is imported from and the name its
/// types are printed with
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub import_path: String,
    pub name: String,
}

impl PackageIdentity {
    pub fn new(import_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            name: name.into(),
        }
    }

    /// The same package seen from its `_test` variant
    pub fn test_variant(&self) -> Self {
        Self {
            import_path: self.import_path.clone(),
            name: format!("{}{}", self.name, TEST_PACKAGE_SUFFIX),
        }
    }

    pub fn is_test_variant(&self) -> bool {
        self.name.ends_with(TEST_PACKAGE_SUFFIX)
    }
}

impl std::fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.import_path)
    }
}
