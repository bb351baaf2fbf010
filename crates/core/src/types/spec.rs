use super::{GenerationMode, PackageIdentity};
use serde::Serialize;

/// One entry of a parameter or result tuple, already named and qualified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Var {
    pub name: String,
    /// Qualified type; for a variadic parameter this is the element type
    pub type_string: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

impl Var {
    pub fn new(name: impl Into<String>, type_string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_string: type_string.into(),
            variadic: false,
        }
    }

    pub fn variadic(name: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            variadic: true,
            ..Self::new(name, element)
        }
    }

    /// `name type`, or `name ...elem` for a variadic parameter
    pub fn declaration(&self) -> String {
        if self.variadic {
            format!("{} ...{}", self.name, self.type_string)
        } else {
            format!("{} {}", self.name, self.type_string)
        }
    }

    /// The name as it appears in a forwarding call
    pub fn forward(&self) -> String {
        if self.variadic {
            format!("{}...", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Everything the templates need to know about one interface method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
    pub name: String,
    /// Full method type as a Go function type, e.g. `func(p []byte) (n int, err error)`
    pub signature: String,
    pub params: Vec<Var>,
    pub results: Vec<Var>,
}

impl MethodSpec {
    /// Declaration form of the parameters: `p []byte, off int64`
    pub fn params_decl(&self) -> String {
        join(&self.params, Var::declaration)
    }

    /// Bare names of the parameters for forwarding: `p, off`
    pub fn args(&self) -> String {
        join(&self.params, Var::forward)
    }

    /// Declaration form of the results: `n int, err error`
    pub fn results_decl(&self) -> String {
        join(&self.results, Var::declaration)
    }

    /// Bare names of the results: `n, err`
    pub fn result_vars(&self) -> String {
        join(&self.results, |v| v.name.clone())
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

fn join(vars: &[Var], render: impl Fn(&Var) -> String) -> String {
    vars.iter().map(render).collect::<Vec<_>>().join(", ")
}

/// The fully resolved input of the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceSpec {
    pub interface_name: String,
    /// Receiver type of the generated methods, e.g. `*ReaderMock`
    pub receiver: String,
    /// Receiver without the pointer star
    pub struct_name: String,
    /// Package clause of the generated file; empty selects stub mode
    pub package_name: String,
    /// Methods in interface declaration order
    pub methods: Vec<MethodSpec>,
    /// Foreign packages referenced by the rendered types
    pub imports: Vec<PackageIdentity>,
}

impl InterfaceSpec {
    pub fn mode(&self) -> GenerationMode {
        GenerationMode::from_mock_flag(!self.package_name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_method() -> MethodSpec {
        MethodSpec {
            name: "Read".to_string(),
            signature: "func(p []byte) (n int, err error)".to_string(),
            params: vec![Var::new("p", "[]byte")],
            results: vec![Var::new("n", "int"), Var::new("err", "error")],
        }
    }

    #[test]
    fn test_declaration_and_names_forms() {
        let method = read_method();
        assert_eq!(method.params_decl(), "p []byte");
        assert_eq!(method.args(), "p");
        assert_eq!(method.results_decl(), "n int, err error");
        assert_eq!(method.result_vars(), "n, err");
        assert!(method.has_results());
    }

    #[test]
    fn test_variadic_forms() {
        let method = MethodSpec {
            name: "Printf".to_string(),
            signature: "func(format string, args ...any)".to_string(),
            params: vec![Var::new("format", "string"), Var::variadic("args", "any")],
            results: vec![],
        };
        assert_eq!(method.params_decl(), "format string, args ...any");
        assert_eq!(method.args(), "format, args...");
        assert_eq!(method.results_decl(), "");
        assert!(!method.has_results());
    }

    #[test]
    fn test_mode_follows_package_name() {
        let mut spec = InterfaceSpec {
            interface_name: "Reader".to_string(),
            receiver: "*ReaderGen".to_string(),
            struct_name: "ReaderGen".to_string(),
            package_name: String::new(),
            methods: vec![read_method()],
            imports: vec![],
        };
        assert_eq!(spec.mode(), GenerationMode::Stub);

        spec.package_name = "store".to_string();
        assert_eq!(spec.mode(), GenerationMode::Mock);
    }
}
