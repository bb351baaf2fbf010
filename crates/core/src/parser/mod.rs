//! Go source parsing and the package symbol table, using tree-sitter

pub mod go_parser;
pub mod source_file;
pub mod symbols;
pub mod utils;

// Re-export commonly used items
pub use go_parser::GoParser;
pub use source_file::{ImportSpec, SourceFile};
pub use symbols::{SymbolTable, TypeDecl};
