use super::{fmt_error, receiver_var};
use crate::{error::Result, types::InterfaceSpec};
use std::fmt::Write;

/// One empty method per interface method, no package clause
pub fn render_stub(spec: &InterfaceSpec) -> Result<String> {
    let mut out = String::new();
    let recv = receiver_var(spec);
    for method in &spec.methods {
        write!(
            out,
            "\nfunc ({recv} {}) {}({})",
            spec.receiver,
            method.name,
            method.params_decl()
        )
        .map_err(fmt_error)?;
        if method.has_results() {
            write!(out, " ({})", method.results_decl()).map_err(fmt_error)?;
        }
        out.push_str(" {\n}\n");
    }
    Ok(out)
}
