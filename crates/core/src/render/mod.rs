//! Go source templates over an [`InterfaceSpec`]

mod mock;
mod stub;

pub use mock::{GENERATED_HEADER, render_mock};
pub use stub::render_stub;

use crate::{
    error::{Error, Result},
    types::{GenerationMode, InterfaceSpec, is_go_identifier},
};
use tracing::debug;

/// Render an interface in the mode its package name selects
pub fn render(spec: &InterfaceSpec) -> Result<String> {
    check_receiver(spec)?;
    let mode = spec.mode();
    debug!(
        "Rendering {} method(s) of {} as {mode:?}",
        spec.methods.len(),
        spec.interface_name
    );
    match mode {
        GenerationMode::Stub => render_stub(spec),
        GenerationMode::Mock => render_mock(spec),
    }
}

fn check_receiver(spec: &InterfaceSpec) -> Result<()> {
    if !is_go_identifier(&spec.struct_name) {
        return Err(Error::RenderFailure(format!(
            "Receiver {:?} does not name a type",
            spec.receiver
        )));
    }
    if spec.mode() == GenerationMode::Mock && !is_go_identifier(&spec.package_name) {
        return Err(Error::RenderFailure(format!(
            "Package name {:?} is not an identifier",
            spec.package_name
        )));
    }
    Ok(())
}

/// Receiver variable, `m` unless a parameter or result already uses it
pub(crate) fn receiver_var(spec: &InterfaceSpec) -> String {
    let mut name = "m".to_string();
    while spec
        .methods
        .iter()
        .flat_map(|method| method.params.iter().chain(&method.results))
        .any(|var| var.name == name)
    {
        name.push('_');
    }
    name
}

pub(crate) fn fmt_error(e: std::fmt::Error) -> Error {
    Error::RenderFailure(e.to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::{InterfaceSpec, MethodSpec, PackageIdentity, Var};

    pub fn reader_spec(package_name: &str) -> InterfaceSpec {
        InterfaceSpec {
            interface_name: "Reader".to_string(),
            receiver: "*ReaderMock".to_string(),
            struct_name: "ReaderMock".to_string(),
            package_name: package_name.to_string(),
            methods: vec![
                MethodSpec {
                    name: "Read".to_string(),
                    signature: "func(p []byte) (n int, err error)".to_string(),
                    params: vec![Var::new("p", "[]byte")],
                    results: vec![Var::new("n", "int"), Var::new("err", "error")],
                },
                MethodSpec {
                    name: "Reset".to_string(),
                    signature: "func(ctx context.Context, opts ...string)".to_string(),
                    params: vec![
                        Var::new("ctx", "context.Context"),
                        Var::variadic("opts", "string"),
                    ],
                    results: vec![],
                },
            ],
            imports: vec![PackageIdentity::new("context", "context")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_on_package_name() {
        let stub = render(&fixtures::reader_spec("")).unwrap();
        assert!(!stub.contains("package"));

        let mock = render(&fixtures::reader_spec("io")).unwrap();
        assert!(mock.starts_with(GENERATED_HEADER));
    }

    #[test]
    fn test_receiver_var_avoids_parameter_names() {
        let mut spec = fixtures::reader_spec("");
        assert_eq!(receiver_var(&spec), "m");

        spec.methods[0].params[0].name = "m".to_string();
        spec.methods[1].results.push(crate::types::Var::new("m_", "bool"));
        assert_eq!(receiver_var(&spec), "m__");
    }

    #[test]
    fn test_invalid_receiver() {
        let mut spec = fixtures::reader_spec("");
        spec.receiver = "*Reader Mock".to_string();
        spec.struct_name = "Reader Mock".to_string();
        assert!(matches!(render(&spec), Err(Error::RenderFailure(_))));
    }

    #[test]
    fn test_invalid_package_name() {
        let spec = fixtures::reader_spec("my-pkg");
        assert!(matches!(render(&spec), Err(Error::RenderFailure(_))));
    }
}
