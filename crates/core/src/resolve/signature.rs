//! Method sets of interfaces, embedded interfaces included

use super::{
    InterfaceDecl, PackageNames, TypeContext, TypeRenderer, find_interface,
    interface::{local_decl, underlying_interface},
    name_signature, signature_string,
};
use crate::{
    error::{Error, Result},
    locator::PackageLocator,
    parser::{GoParser, SymbolTable, TypeDecl, utils::named_children},
    qualifier::Qualifier,
    types::{MethodSpec, PackageIdentity, Var},
};
use std::collections::HashSet;
use tree_sitter::Node;
use tracing::{debug, info, warn};

/// Turns an interface body into ordered [`MethodSpec`]s
pub struct SignatureResolver<'a> {
    renderer: TypeRenderer<'a>,
    locator: Option<&'a dyn PackageLocator>,
    parser: GoParser,
    methods: Vec<MethodSpec>,
    seen: HashSet<String>,
    /// `(import path, declaration)` pairs currently being expanded
    expanding: Vec<(String, String)>,
}

impl<'a> SignatureResolver<'a> {
    pub fn new(
        qualifier: &'a Qualifier,
        names: &'a PackageNames<'a>,
        locator: Option<&'a dyn PackageLocator>,
    ) -> Result<Self> {
        Ok(Self {
            renderer: TypeRenderer::new(qualifier, names),
            locator,
            parser: GoParser::new()?,
            methods: Vec::new(),
            seen: HashSet::new(),
            expanding: Vec::new(),
        })
    }

    /// Methods in declaration order and the foreign packages their types use
    pub fn resolve(
        mut self,
        table: &SymbolTable,
        interface: &InterfaceDecl,
    ) -> Result<(Vec<MethodSpec>, Vec<PackageIdentity>)> {
        self.expand(table, interface.decl, interface.body)?;
        info!(
            "Resolved {} method(s) of {}",
            self.methods.len(),
            interface.name
        );
        let imports = self.renderer.imports();
        Ok((self.methods, imports))
    }

    fn expand(&mut self, table: &SymbolTable, decl: TypeDecl, body: Node) -> Result<()> {
        let key = (table.package().import_path.clone(), decl.name.to_string());
        if self.expanding.contains(&key) {
            warn!("Interface {} embeds itself; skipping the cycle", decl.name);
            return Ok(());
        }
        self.expanding.push(key);

        let type_params = decl.type_params();
        let ctx = TypeContext {
            file: decl.file,
            package: table.package(),
            type_params: &type_params,
        };
        let outcome = if body.kind() == "qualified_type" {
            self.expand_foreign(&ctx, body)
        } else {
            self.expand_elems(table, &ctx, body);
            Ok(())
        };

        self.expanding.pop();
        outcome
    }

    fn expand_elems(&mut self, table: &SymbolTable, ctx: &TypeContext, body: Node) {
        for elem in named_children(&body) {
            match elem.kind() {
                "method_elem" | "method_spec" => self.add_method(ctx, elem),
                "type_elem" | "constraint_elem" | "interface_type_name" => {
                    let terms = named_children(&elem);
                    match terms.as_slice() {
                        [single] => self.embed(table, ctx, *single),
                        _ => debug!("Skipping type set {}", ctx.text(&elem)),
                    }
                }
                "type_identifier" | "qualified_type" => self.embed(table, ctx, elem),
                other => debug!("Skipping interface element {other}"),
            }
        }
    }

    fn add_method(&mut self, ctx: &TypeContext, elem: Node) {
        let Some(name) = elem.child_by_field_name("name").map(|n| ctx.text(&n)) else {
            return;
        };
        let params = self
            .renderer
            .tuple(ctx, elem.child_by_field_name("parameters"));
        let results = self.renderer.tuple(ctx, elem.child_by_field_name("result"));
        let signature = signature_string(&params, &results);
        let (params, results) = name_signature(params, results);
        self.push(MethodSpec {
            name: name.to_string(),
            signature,
            params,
            results,
        });
    }

    fn push(&mut self, method: MethodSpec) {
        if !self.seen.insert(method.name.clone()) {
            debug!("Method {} already in the set", method.name);
            return;
        }
        debug!("Method {}: {}", method.name, method.signature);
        self.methods.push(method);
    }

    fn embed(&mut self, table: &SymbolTable, ctx: &TypeContext, node: Node) {
        match node.kind() {
            "type_identifier" => {
                let name = ctx.text(&node);
                let decls = table.declarations();
                match local_decl(&decls, name) {
                    Some(decl) => match underlying_interface(&decls, decl, 0) {
                        Some((owner, body)) => {
                            if let Err(e) = self.expand(table, owner, body) {
                                warn!("Skipping embedded {name}: {e}");
                            }
                        }
                        None => warn!("Embedded {name} is not an interface; skipping"),
                    },
                    None if name == "error" => self.push(error_method()),
                    None => warn!("Embedded interface {name} not found; skipping"),
                }
            }
            "qualified_type" => {
                if let Err(e) = self.expand_foreign(ctx, node) {
                    warn!("Skipping embedded {}: {e}", ctx.text(&node));
                }
            }
            "generic_type" => {
                if let Some(inner) = node.child_by_field_name("type") {
                    self.embed(table, ctx, inner);
                }
            }
            "parenthesized_type" => {
                if let Some(inner) = named_children(&node).into_iter().next() {
                    self.embed(table, ctx, inner);
                }
            }
            other => debug!("Skipping embedded {other}"),
        }
    }

    /// Expand the interface a `pkg.Name` node refers to, loading its
    /// package through the locator
    fn expand_foreign(&mut self, ctx: &TypeContext, node: Node) -> Result<()> {
        let (Some(package), Some(name)) = (
            node.child_by_field_name("package"),
            node.child_by_field_name("name"),
        ) else {
            return Err(unresolved(ctx, node, "not a package-qualified name"));
        };
        let local = ctx.text(&package);
        let name = ctx.text(&name);

        let identity = self
            .renderer
            .resolve_package(ctx, local)
            .ok_or_else(|| unresolved(ctx, node, format!("no import for {local}")))?;
        let locator = self.locator.ok_or_else(|| {
            unresolved(ctx, node, format!("cannot locate {}", identity.import_path))
        })?;

        debug!("Following {local}.{name} into {}", identity.import_path);
        let package = locator.resolve(&identity.import_path)?;
        let foreign = SymbolTable::load(&mut self.parser, &package)?;
        let found = find_interface(&foreign, name)?;
        self.expand(&foreign, found.decl, found.body)
    }
}

fn unresolved(ctx: &TypeContext, node: Node, reason: impl std::fmt::Display) -> Error {
    Error::InterfaceNotFound {
        name: ctx.text(&node).to_string(),
        package: ctx.package.import_path.clone(),
        detail: format!(" ({reason})"),
    }
}

/// The method set of the predeclared `error` interface
fn error_method() -> MethodSpec {
    MethodSpec {
        name: "Error".to_string(),
        signature: "func() string".to_string(),
        params: Vec::new(),
        results: vec![Var::new("r0", "string")],
    }
}
