//! Workspace facade over `ifacegen-core`, used by the integration tests in `tests/`
pub use ifacegen_core::*;
