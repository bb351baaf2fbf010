use super::{
    GoParser, SourceFile,
    utils::{field_children, named_children},
};
use crate::{
    error::{Error, Result},
    locator::Package,
    types::PackageIdentity,
};
use tree_sitter::Node;
use tracing::{debug, warn};

/// A top-level `type` declaration
#[derive(Debug, Clone, Copy)]
pub struct TypeDecl<'t> {
    pub name: &'t str,
    pub file: &'t SourceFile,
    /// The `type_spec` or `type_alias` node
    pub spec: Node<'t>,
    /// The declared (or aliased) type expression
    pub type_node: Node<'t>,
    pub is_alias: bool,
}

impl<'t> TypeDecl<'t> {
    /// Names of the declaration's type parameters, if it is generic
    pub fn type_params(&self) -> Vec<String> {
        let Some(list) = self.spec.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        named_children(&list)
            .iter()
            .flat_map(|param| field_children(param, "name"))
            .map(|name| self.file.text(&name).to_string())
            .collect()
    }
}

/// The declarations of one package, indexed from its parsed files
#[derive(Debug)]
pub struct SymbolTable {
    package: PackageIdentity,
    files: Vec<SourceFile>,
}

impl SymbolTable {
    /// Parse every file of a resolved package
    pub fn load(parser: &mut GoParser, package: &Package) -> Result<Self> {
        let files = package
            .files
            .iter()
            .map(|path| SourceFile::load(parser, path))
            .collect::<Result<Vec<_>>>()?;
        Self::from_files(&package.import_path, files)
    }

    /// Build from parsed files; the first package clause names the package
    /// and files declaring another package are left out
    pub fn from_files(import_path: &str, files: Vec<SourceFile>) -> Result<Self> {
        let name = files
            .iter()
            .find_map(|f| f.package_name())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::ParseError(format!("No package clause in package {import_path:?}"))
            })?;

        let mut kept = Vec::with_capacity(files.len());
        for file in files {
            if file.package_name() != Some(name.as_str()) {
                warn!(
                    "Ignoring {}: package {:?} differs from {name:?}",
                    file.path.display(),
                    file.package_name()
                );
                continue;
            }
            if file.has_syntax_errors() {
                warn!("{} has syntax errors; indexing what parsed", file.path.display());
            }
            kept.push(file);
        }

        debug!("Indexed package {name} ({import_path}) from {} files", kept.len());
        Ok(Self {
            package: PackageIdentity::new(import_path, name),
            files: kept,
        })
    }

    pub fn package(&self) -> &PackageIdentity {
        &self.package
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Every top-level type declaration, in file order then source order
    pub fn declarations(&self) -> Vec<TypeDecl<'_>> {
        let mut decls = Vec::new();
        for file in &self.files {
            let root = file.root();
            for decl in named_children(&root)
                .into_iter()
                .filter(|n| n.kind() == "type_declaration")
            {
                for spec in named_children(&decl) {
                    let is_alias = match spec.kind() {
                        "type_spec" => false,
                        "type_alias" => true,
                        _ => continue,
                    };
                    let (Some(name), Some(type_node)) = (
                        spec.child_by_field_name("name"),
                        spec.child_by_field_name("type"),
                    ) else {
                        continue;
                    };
                    decls.push(TypeDecl {
                        name: file.text(&name),
                        file,
                        spec,
                        type_node,
                        is_alias,
                    });
                }
            }
        }
        decls
    }
}
