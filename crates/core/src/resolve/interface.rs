//! Lookup of a named interface in a package's symbol table

use crate::{
    error::{Error, Result},
    parser::{SymbolTable, TypeDecl, utils::named_children},
};
use tree_sitter::Node;
use tracing::debug;

/// Alias and definition chains longer than this are treated as unresolved
const MAX_ALIAS_DEPTH: usize = 16;

/// An interface declaration found by name
#[derive(Debug, Clone, Copy)]
pub struct InterfaceDecl<'t> {
    /// The name that was asked for
    pub name: &'t str,
    /// The declaration owning `body`; differs from the named declaration
    /// when an alias or definition was followed
    pub decl: TypeDecl<'t>,
    /// An `interface_type`, or the `qualified_type` of an interface that
    /// lives in another package
    pub body: Node<'t>,
}

/// First declaration named `name` whose underlying type is an interface
pub fn find_interface<'t>(table: &'t SymbolTable, name: &str) -> Result<InterfaceDecl<'t>> {
    let decls = table.declarations();
    let mut seen_shape = None;

    for decl in decls.iter().filter(|d| d.name == name) {
        match underlying_interface(&decls, *decl, 0) {
            Some((owner, body)) => {
                debug!(
                    "Found interface {name} in {} (declared in {})",
                    table.package(),
                    owner.file.path.display()
                );
                return Ok(InterfaceDecl {
                    name: decl.name,
                    decl: owner,
                    body,
                });
            }
            None => {
                debug!("Skipping {name}: declared as {}", shape(decl.type_node));
                seen_shape.get_or_insert_with(|| shape(decl.type_node));
            }
        }
    }

    Err(Error::InterfaceNotFound {
        name: name.to_string(),
        package: table.package().import_path.clone(),
        detail: seen_shape
            .map(|shape| format!(" (declared as {shape})"))
            .unwrap_or_default(),
    })
}

/// Local declaration named `name`, if any
pub(crate) fn local_decl<'t>(decls: &[TypeDecl<'t>], name: &str) -> Option<TypeDecl<'t>> {
    decls.iter().find(|d| d.name == name).copied()
}

/// Follow `decl` through local names until an interface body or a
/// foreign type shows up
pub(crate) fn underlying_interface<'t>(
    decls: &[TypeDecl<'t>],
    decl: TypeDecl<'t>,
    depth: usize,
) -> Option<(TypeDecl<'t>, Node<'t>)> {
    if depth > MAX_ALIAS_DEPTH {
        return None;
    }
    let mut node = decl.type_node;
    loop {
        match node.kind() {
            "interface_type" | "qualified_type" => return Some((decl, node)),
            "parenthesized_type" => node = named_children(&node).into_iter().next()?,
            "generic_type" => node = node.child_by_field_name("type")?,
            "type_identifier" => {
                let target = local_decl(decls, decl.file.text(&node))?;
                return underlying_interface(decls, target, depth + 1);
            }
            _ => return None,
        }
    }
}

fn shape(node: Node) -> &'static str {
    match node.kind() {
        "struct_type" => "struct",
        "function_type" => "func",
        "map_type" => "map",
        "slice_type" => "slice",
        "array_type" => "array",
        "pointer_type" => "pointer",
        "channel_type" => "chan",
        _ => "non-interface type",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{GoParser, SourceFile};
    use std::path::PathBuf;

    fn table(source: &str) -> SymbolTable {
        let mut parser = GoParser::new().unwrap();
        let file = SourceFile::parse(&mut parser, PathBuf::from("a.go"), source.to_string()).unwrap();
        SymbolTable::from_files("example.com/shapes", vec![file]).unwrap()
    }

    #[test]
    fn test_find_interface() {
        let table = table("package shapes\n\ntype Shape interface {\n\tArea() float64\n}\n");
        let found = find_interface(&table, "Shape").unwrap();
        assert_eq!(found.name, "Shape");
        assert_eq!(found.body.kind(), "interface_type");
    }

    #[test]
    fn test_first_match_wins() {
        let table = table(
            "package shapes\n\ntype Shape struct{}\n\ntype Shape interface{ Area() float64 }\n\ntype Shape interface{ Perimeter() float64 }\n",
        );
        let found = find_interface(&table, "Shape").unwrap();
        assert!(found.decl.file.text(&found.body).contains("Area"));
    }

    #[test]
    fn test_alias_and_definition_are_followed() {
        let table = table(
            "package shapes\n\ntype base interface{ Area() float64 }\n\ntype Shape = base\n\ntype Solid base\n",
        );
        let alias = find_interface(&table, "Shape").unwrap();
        assert_eq!(alias.name, "Shape");
        assert_eq!(alias.decl.name, "base");

        let definition = find_interface(&table, "Solid").unwrap();
        assert_eq!(definition.decl.name, "base");
    }

    #[test]
    fn test_foreign_alias_and_definition_stop_at_qualified_type() {
        let table = table(
            "package shapes\n\nimport \"example.com/streams\"\n\ntype Reader = streams.Reader\n\ntype Source Reader\n",
        );
        let alias = find_interface(&table, "Reader").unwrap();
        assert_eq!(alias.body.kind(), "qualified_type");
        assert_eq!(alias.decl.file.text(&alias.body), "streams.Reader");

        let definition = find_interface(&table, "Source").unwrap();
        assert_eq!(definition.name, "Source");
        assert_eq!(definition.decl.name, "Reader");
        assert_eq!(definition.body.kind(), "qualified_type");
    }

    #[test]
    fn test_alias_cycle_is_not_found() {
        let table = table("package shapes\n\ntype A = B\n\ntype B = A\n");
        assert!(matches!(
            find_interface(&table, "A"),
            Err(Error::InterfaceNotFound { .. })
        ));
    }

    #[test]
    fn test_non_interface_shape_is_reported() {
        let table = table("package shapes\n\ntype Shape struct{ Sides int }\n");
        let err = find_interface(&table, "Shape").unwrap_err();
        match &err {
            Error::InterfaceNotFound {
                name,
                package,
                detail,
            } => {
                assert_eq!(name, "Shape");
                assert_eq!(package, "example.com/shapes");
                assert_eq!(detail, " (declared as struct)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Shape"));
    }

    #[test]
    fn test_missing_interface() {
        let table = table("package shapes\n\ntype Other interface{}\n");
        let err = find_interface(&table, "Shape").unwrap_err();
        assert!(matches!(
            err,
            Error::InterfaceNotFound { ref detail, .. } if detail.is_empty()
        ));
    }
}
