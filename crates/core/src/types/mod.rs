pub mod identity;
pub mod mode;
pub mod spec;
pub mod target;

// Re-export commonly used types
pub use identity::{PackageIdentity, TEST_PACKAGE_SUFFIX};
pub use mode::GenerationMode;
pub use spec::{InterfaceSpec, MethodSpec, Var};
pub use target::{InterfaceTarget, is_go_identifier};
