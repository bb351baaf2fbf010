use super::{fmt_error, receiver_var};
use crate::{
    error::Result,
    resolve::guess_package_name,
    types::{InterfaceSpec, MethodSpec, PackageIdentity},
};
use std::fmt::Write;

pub const GENERATED_HEADER: &str = "// Code generated by ifacegen. DO NOT EDIT.";

const ATOMIC_IMPORT: &str = "sync/atomic";
const TESTING_IMPORT: &str = "testing";

/// A complete mock file: package clause, imports, call slots, the mock
/// struct and its methods
pub fn render_mock(spec: &InterfaceSpec) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{GENERATED_HEADER}\n").map_err(fmt_error)?;
    writeln!(out, "package {}\n", spec.package_name).map_err(fmt_error)?;
    write_imports(&mut out, spec)?;
    write_consts(&mut out, spec)?;
    write_struct(&mut out, spec)?;
    let recv = receiver_var(spec);
    for method in &spec.methods {
        write_method(&mut out, spec, &recv, method)?;
    }
    Ok(out)
}

/// Name of the constant indexing `method`'s call counter
fn slot_name(spec: &InterfaceSpec, method: &MethodSpec) -> String {
    format!("call{}{}", spec.struct_name, method.name)
}

fn import_line(package: &PackageIdentity) -> String {
    if guess_package_name(&package.import_path) == package.name {
        format!("\t{:?}", package.import_path)
    } else {
        format!("\t{} {:?}", package.name, package.import_path)
    }
}

fn write_imports(out: &mut String, spec: &InterfaceSpec) -> Result<()> {
    let mut standard = Vec::new();
    if !spec.methods.is_empty() {
        standard.push(ATOMIC_IMPORT);
    }
    standard.push(TESTING_IMPORT);

    let foreign: Vec<&PackageIdentity> = spec
        .imports
        .iter()
        .filter(|p| !standard.contains(&p.import_path.as_str()))
        .collect();

    out.push_str("import (\n");
    for path in &standard {
        writeln!(out, "\t{path:?}").map_err(fmt_error)?;
    }
    if !foreign.is_empty() {
        out.push('\n');
        for package in foreign {
            writeln!(out, "{}", import_line(package)).map_err(fmt_error)?;
        }
    }
    out.push_str(")\n\n");
    Ok(())
}

fn write_consts(out: &mut String, spec: &InterfaceSpec) -> Result<()> {
    if spec.methods.is_empty() {
        return Ok(());
    }
    out.push_str("const (\n");
    for (index, method) in spec.methods.iter().enumerate() {
        writeln!(out, "\t{} = {index}", slot_name(spec, method)).map_err(fmt_error)?;
    }
    out.push_str(")\n\n");
    Ok(())
}

fn write_struct(out: &mut String, spec: &InterfaceSpec) -> Result<()> {
    writeln!(
        out,
        "// {} is a call-counting mock of {}.",
        spec.struct_name, spec.interface_name
    )
    .map_err(fmt_error)?;
    writeln!(out, "type {} struct {{", spec.struct_name).map_err(fmt_error)?;
    out.push_str("\tT testing.TB\n\tPanicIfNotMocked bool\n");
    if !spec.methods.is_empty() {
        out.push('\n');
    }
    for method in &spec.methods {
        writeln!(out, "\t{}Mock {}", method.name, method.signature).map_err(fmt_error)?;
    }
    writeln!(out, "\n\tcallCounts [{}]int32\n}}", spec.methods.len()).map_err(fmt_error)?;
    Ok(())
}

fn write_method(
    out: &mut String,
    spec: &InterfaceSpec,
    m: &str,
    method: &MethodSpec,
) -> Result<()> {
    let slot = slot_name(spec, method);
    let name = &method.name;
    let results = if method.has_results() {
        format!(" ({})", method.results_decl())
    } else {
        String::new()
    };

    writeln!(
        out,
        "\nfunc ({m} {}) {name}({}){results} {{",
        spec.receiver,
        method.params_decl()
    )
    .map_err(fmt_error)?;
    writeln!(out, "\tatomic.AddInt32(&{m}.callCounts[{slot}], 1)").map_err(fmt_error)?;
    writeln!(out, "\tif {m}.{name}Mock == nil {{").map_err(fmt_error)?;
    writeln!(out, "\t\tif {m}.PanicIfNotMocked {{").map_err(fmt_error)?;
    writeln!(out, "\t\t\tif {m}.T == nil {{").map_err(fmt_error)?;
    writeln!(out, "\t\t\t\tpanic(\"{name} is not mocked\")").map_err(fmt_error)?;
    out.push_str("\t\t\t}\n");
    writeln!(out, "\t\t\t{m}.T.Error(\"{name} is not mocked\")").map_err(fmt_error)?;
    out.push_str("\t\t}\n");
    if method.has_results() {
        writeln!(out, "\t\treturn {}", method.result_vars()).map_err(fmt_error)?;
    } else {
        out.push_str("\t\treturn\n");
    }
    out.push_str("\t}\n");
    let call = format!("{m}.{name}Mock({})", method.args());
    if method.has_results() {
        writeln!(out, "\treturn {call}").map_err(fmt_error)?;
    } else {
        writeln!(out, "\t{call}").map_err(fmt_error)?;
    }
    out.push_str("}\n");

    writeln!(out, "\nfunc ({m} {}) {name}CallCount() int {{", spec.receiver).map_err(fmt_error)?;
    writeln!(out, "\treturn int(atomic.LoadInt32(&{m}.callCounts[{slot}]))").map_err(fmt_error)?;
    out.push_str("}\n");
    Ok(())
}
