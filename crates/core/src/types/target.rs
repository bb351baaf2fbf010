use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// The interface named on the command line, `[import_path.]InterfaceName`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceTarget {
    /// Import path of the package declaring the interface; empty means the
    /// package in the working directory
    pub import_path: String,
    pub name: String,
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*$").expect("identifier pattern is valid")
    })
}

/// Whether `name` is a valid Go identifier
pub fn is_go_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

impl InterfaceTarget {
    /// Split an identifier at its last `.`, as long as no `/` follows it.
    ///
    /// `net/http.Handler` names `Handler` in `net/http`, `Handler` names it in
    /// the current package and `gopkg.in/yaml.v2.Marshaler` keeps the dotted
    /// trailing segment of the path. A dot that only appears before a later
    /// slash (`a.b/c`) cannot separate a package from a name and is rejected.
    pub fn parse(identifier: &str) -> Result<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(Error::malformed(identifier, "interface name is required"));
        }

        let (import_path, name) = match identifier.rfind('.') {
            None => ("", identifier),
            Some(dot) => {
                if identifier[dot..].contains('/') {
                    return Err(Error::malformed(
                        identifier,
                        "no package/name separator after the last '/'",
                    ));
                }
                let import_path = &identifier[..dot];
                if import_path.is_empty() {
                    return Err(Error::malformed(identifier, "empty import path before '.'"));
                }
                (import_path, &identifier[dot + 1..])
            }
        };

        if name.is_empty() {
            return Err(Error::malformed(identifier, "empty interface name after '.'"));
        }
        if !is_go_identifier(name) {
            return Err(Error::malformed(
                identifier,
                format!("{name:?} is not a Go identifier"),
            ));
        }

        Ok(Self {
            import_path: import_path.to_string(),
            name: name.to_string(),
        })
    }

    pub fn is_current_package(&self) -> bool {
        self.import_path.is_empty()
    }
}

impl std::fmt::Display for InterfaceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.import_path.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.import_path, self.name)
        }
    }
}
