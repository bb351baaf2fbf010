//! Normalization of rendered Go source

mod builtin;
mod external;

pub use builtin::BuiltinFormatter;
pub use external::ExternalFormatter;

use crate::{
    error::{Error, Result},
    types::GenerationMode,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

/// Turns rendered text into its final, canonical form
pub trait Formatter {
    fn format(&self, source: &str, mode: GenerationMode) -> Result<String>;

    fn name(&self) -> &str;
}

/// Which formatter to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    /// The external program when it is on `PATH`, else the builtin
    #[default]
    Auto,
    Builtin,
    External,
}

impl FromStr for FormatterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "builtin" => Ok(Self::Builtin),
            "external" => Ok(Self::External),
            other => Err(Error::ConfigError(format!(
                "Unknown formatter {other:?}, expected auto, builtin or external"
            ))),
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Builtin => "builtin",
            Self::External => "external",
        };
        f.write_str(name)
    }
}

/// Formatter for `mode`; `command` replaces the default external program
pub fn select_formatter(
    kind: FormatterKind,
    mode: GenerationMode,
    command: Option<&str>,
) -> Box<dyn Formatter> {
    let external = match command {
        Some(command) => ExternalFormatter::from_command_line(command),
        None => ExternalFormatter::for_mode(mode),
    };
    let formatter: Box<dyn Formatter> = match kind {
        FormatterKind::Builtin => Box::new(BuiltinFormatter),
        FormatterKind::External => Box::new(external),
        FormatterKind::Auto if external.is_available() => Box::new(external),
        FormatterKind::Auto => Box::new(BuiltinFormatter),
    };
    debug!("Using the {} formatter ({kind})", formatter.name());
    formatter
}
