use std::io;

/// Errors that can occur while generating interface code
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed interface identifier {identifier:?}: {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    #[error("Package {import_path:?} not found (searched {searched} location(s))")]
    PackageNotFound { import_path: String, searched: usize },

    #[error("Interface {name} is not found in package {package:?}{detail}")]
    InterfaceNotFound {
        name: String,
        package: String,
        detail: String,
    },

    #[error("Render error: {0}")]
    RenderFailure(String),

    #[error("Format error: {reason} of code\n`{code}`")]
    FormatFailure { reason: String, code: String },

    #[error("Write error for {target}: {source}")]
    WriteFailure {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    pub fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        Error::MalformedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    pub fn format_failure(reason: impl Into<String>, code: &str) -> Self {
        Error::FormatFailure {
            reason: reason.into(),
            code: code.to_string(),
        }
    }
}

/// Result type alias for ifacegen operations
pub type Result<T> = std::result::Result<T, Error>;
