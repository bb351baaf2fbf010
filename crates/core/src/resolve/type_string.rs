//! Canonical, qualified text of Go type expressions

use super::PackageNames;
use crate::{
    parser::{
        SourceFile,
        utils::{field_children, named_children, token_kinds},
    },
    qualifier::Qualifier,
    types::PackageIdentity,
};
use std::collections::BTreeSet;
use tree_sitter::Node;
use tracing::{debug, warn};

const PREDECLARED: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

pub fn is_predeclared(name: &str) -> bool {
    PREDECLARED.contains(&name)
}

/// A tuple entry before naming: the name as written, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVar {
    pub name: Option<String>,
    pub type_string: String,
    pub variadic: bool,
}

impl RawVar {
    pub fn new(name: Option<String>, type_string: &str) -> Self {
        Self {
            name,
            type_string: type_string.to_string(),
            variadic: false,
        }
    }

    fn written(&self) -> String {
        let ty = if self.variadic {
            format!("...{}", self.type_string)
        } else {
            self.type_string.clone()
        };
        match &self.name {
            Some(name) => format!("{name} {ty}"),
            None => ty,
        }
    }
}

/// Go's rendering of a function type from its tuples, names as written:
/// `func(p []byte) (n int, err error)`, `func() string`
pub fn signature_string(params: &[RawVar], results: &[RawVar]) -> String {
    let mut out = format!("func({})", tuple_string(params));
    match results {
        [] => {}
        [single] if single.name.is_none() => {
            out.push(' ');
            out.push_str(&single.written());
        }
        _ => {
            out.push_str(" (");
            out.push_str(&tuple_string(results));
            out.push(')');
        }
    }
    out
}

fn tuple_string(vars: &[RawVar]) -> String {
    vars.iter().map(RawVar::written).collect::<Vec<_>>().join(", ")
}

/// Where a type expression was written
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'t> {
    pub file: &'t SourceFile,
    /// Package declaring the expression
    pub package: &'t PackageIdentity,
    /// Type parameters in scope, printed as written
    pub type_params: &'t [String],
}

impl<'t> TypeContext<'t> {
    pub fn text(&self, node: &Node) -> &'t str {
        self.file.text(node)
    }
}

/// Renders type expressions against the destination package and records
/// the foreign packages that end up as prefixes
pub struct TypeRenderer<'a> {
    qualifier: &'a Qualifier,
    names: &'a PackageNames<'a>,
    imports: BTreeSet<PackageIdentity>,
}

impl<'a> TypeRenderer<'a> {
    pub fn new(qualifier: &'a Qualifier, names: &'a PackageNames<'a>) -> Self {
        Self {
            qualifier,
            names,
            imports: BTreeSet::new(),
        }
    }

    /// Foreign packages referenced so far, ordered by import path
    pub fn imports(&self) -> Vec<PackageIdentity> {
        let mut imports: Vec<_> = self.imports.iter().cloned().collect();
        imports.sort_by(|a, b| a.import_path.cmp(&b.import_path));
        imports
    }

    /// Identity of the package a file refers to as `local`
    pub fn resolve_package(&self, ctx: &TypeContext, local: &str) -> Option<PackageIdentity> {
        let names = self.names;
        ctx.file
            .find_import(local, |path| names.name_of(path))
            .map(|spec| names.identity(&spec.path))
    }

    fn qualified(&mut self, package: &PackageIdentity, name: &str) -> String {
        if !self.qualifier.qualify(package).is_empty() {
            self.imports.insert(package.clone());
        }
        self.qualifier.type_name(package, name)
    }

    pub fn render(&mut self, ctx: &TypeContext, node: Node) -> String {
        match node.kind() {
            "type_identifier" => {
                let name = ctx.text(&node);
                if is_predeclared(name) || ctx.type_params.iter().any(|p| p == name) {
                    name.to_string()
                } else {
                    self.qualified(ctx.package, name)
                }
            }
            "qualified_type" => self.render_qualified(ctx, node),
            "pointer_type" => format!("*{}", self.render_first(ctx, node)),
            "slice_type" => format!("[]{}", self.render_field(ctx, node, "element")),
            "array_type" => {
                let length = node
                    .child_by_field_name("length")
                    .map(|n| collapse_whitespace(ctx.text(&n)))
                    .unwrap_or_default();
                format!("[{length}]{}", self.render_field(ctx, node, "element"))
            }
            "implicit_length_array_type" => {
                format!("[...]{}", self.render_field(ctx, node, "element"))
            }
            "map_type" => format!(
                "map[{}]{}",
                self.render_field(ctx, node, "key"),
                self.render_field(ctx, node, "value")
            ),
            "channel_type" => {
                let value = self.render_field(ctx, node, "value");
                match token_kinds(&node).as_slice() {
                    ["<-", "chan", ..] => format!("<-chan {value}"),
                    ["chan", "<-", ..] => format!("chan<- {value}"),
                    _ => format!("chan {value}"),
                }
            }
            "function_type" => {
                let params = self.tuple(ctx, node.child_by_field_name("parameters"));
                let results = self.tuple(ctx, node.child_by_field_name("result"));
                signature_string(&params, &results)
            }
            "interface_type" => self.render_interface(ctx, node),
            "struct_type" => self.render_struct(ctx, node),
            "generic_type" => {
                let base = self.render_field(ctx, node, "type");
                let args = node
                    .child_by_field_name("type_arguments")
                    .map(|list| {
                        named_children(&list)
                            .into_iter()
                            .map(|arg| self.render(ctx, arg))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                format!("{base}[{args}]")
            }
            "type_elem" | "constraint_elem" => named_children(&node)
                .into_iter()
                .map(|t| self.render(ctx, t))
                .collect::<Vec<_>>()
                .join(" | "),
            "negated_type" => format!("~{}", self.render_first(ctx, node)),
            "parenthesized_type" => self.render_first(ctx, node),
            other => {
                debug!("Rendering {other} node verbatim");
                collapse_whitespace(ctx.text(&node))
            }
        }
    }

    fn render_first(&mut self, ctx: &TypeContext, node: Node) -> String {
        match named_children(&node).into_iter().next() {
            Some(inner) => self.render(ctx, inner),
            None => collapse_whitespace(ctx.text(&node)),
        }
    }

    fn render_field(&mut self, ctx: &TypeContext, node: Node, field: &str) -> String {
        match node.child_by_field_name(field) {
            Some(inner) => self.render(ctx, inner),
            None => collapse_whitespace(ctx.text(&node)),
        }
    }

    fn render_qualified(&mut self, ctx: &TypeContext, node: Node) -> String {
        let (Some(package), Some(name)) = (
            node.child_by_field_name("package"),
            node.child_by_field_name("name"),
        ) else {
            return collapse_whitespace(ctx.text(&node));
        };
        let local = ctx.text(&package);
        let name = ctx.text(&name);
        match self.resolve_package(ctx, local) {
            Some(identity) => self.qualified(&identity, name),
            None => {
                warn!(
                    "No import for package {local:?} in {}; keeping {local}.{name}",
                    ctx.file.path.display()
                );
                format!("{local}.{name}")
            }
        }
    }

    fn render_interface(&mut self, ctx: &TypeContext, node: Node) -> String {
        let elems: Vec<String> = named_children(&node)
            .into_iter()
            .map(|elem| match elem.kind() {
                "method_elem" | "method_spec" => {
                    let name = elem
                        .child_by_field_name("name")
                        .map(|n| ctx.text(&n))
                        .unwrap_or_default();
                    let params = self.tuple(ctx, elem.child_by_field_name("parameters"));
                    let results = self.tuple(ctx, elem.child_by_field_name("result"));
                    let signature = signature_string(&params, &results);
                    format!("{name}{}", signature.strip_prefix("func").unwrap_or(&signature))
                }
                _ => self.render(ctx, elem),
            })
            .collect();
        if elems.is_empty() {
            "interface{}".to_string()
        } else {
            format!("interface{{{}}}", elems.join("; "))
        }
    }

    fn render_struct(&mut self, ctx: &TypeContext, node: Node) -> String {
        let mut fields = Vec::new();
        for list in named_children(&node)
            .into_iter()
            .filter(|n| n.kind() == "field_declaration_list")
        {
            for field in named_children(&list)
                .into_iter()
                .filter(|n| n.kind() == "field_declaration")
            {
                let Some(ty) = field.child_by_field_name("type") else {
                    continue;
                };
                let mut ty = self.render(ctx, ty);
                let names: Vec<&str> = field_children(&field, "name")
                    .iter()
                    .map(|n| ctx.text(n))
                    .collect();
                if names.is_empty() && token_kinds(&field).contains(&"*") {
                    ty = format!("*{ty}");
                }
                let tag = field
                    .child_by_field_name("tag")
                    .map(|tag| format!(" {}", ctx.text(&tag)))
                    .unwrap_or_default();
                if names.is_empty() {
                    fields.push(format!("{ty}{tag}"));
                }
                for name in names {
                    fields.push(format!("{name} {ty}{tag}"));
                }
            }
        }
        if fields.is_empty() {
            "struct{}".to_string()
        } else {
            format!("struct{{{}}}", fields.join("; "))
        }
    }

    /// Entries of a `parameter_list`, or the single entry of a bare result
    /// type; `None` is the empty tuple
    pub fn tuple(&mut self, ctx: &TypeContext, node: Option<Node>) -> Vec<RawVar> {
        let Some(node) = node else {
            return Vec::new();
        };
        if node.kind() != "parameter_list" {
            return vec![RawVar::new(None, &self.render(ctx, node))];
        }

        let mut vars = Vec::new();
        for decl in named_children(&node) {
            let variadic = match decl.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let Some(ty) = decl.child_by_field_name("type") else {
                continue;
            };
            let type_string = self.render(ctx, ty);
            let names = field_children(&decl, "name");
            if names.is_empty() {
                vars.push(RawVar {
                    name: None,
                    type_string,
                    variadic,
                });
            } else {
                for name in names {
                    vars.push(RawVar {
                        name: Some(ctx.text(&name).to_string()),
                        type_string: type_string.clone(),
                        variadic,
                    });
                }
            }
        }
        vars
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
