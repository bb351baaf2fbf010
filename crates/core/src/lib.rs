//! ifacegen - Generate Go interface stubs and call-counting mocks
//!
//! This crate provides functionality to:
//! - Locate Go packages through GOROOT, GOPATH, Go modules and vendor directories
//! - Parse Go packages with tree-sitter and find interfaces by name
//! - Resolve method signatures qualified against a destination package
//! - Render method stubs or complete mock files and format them
pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod locator;
pub mod output;
pub mod parser;
pub mod qualifier;
pub mod render;
pub mod resolve;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::Config;
pub use format::{BuiltinFormatter, ExternalFormatter, Formatter, FormatterKind, select_formatter};
pub use generator::{GenerateRequest, Generator};
pub use locator::{BuildContext, GoLocator, Package, PackageLocator};
pub use output::write_output;
pub use qualifier::Qualifier;
