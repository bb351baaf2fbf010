use super::{
    GoParser,
    utils::{named_children, node_text},
};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// One `import` line of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name, including `_` and `.`
    pub alias: Option<String>,
    pub path: String,
}

impl ImportSpec {
    /// Blank and dot imports introduce no package identifier
    pub fn is_named_binding(&self) -> bool {
        !matches!(self.alias.as_deref(), Some("_") | Some("."))
    }
}

/// A parsed Go file with its package clause and imports
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    tree: Tree,
    package_name: Option<String>,
    imports: Vec<ImportSpec>,
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("package_name", &self.package_name)
            .field("imports", &self.imports)
            .finish()
    }
}

impl SourceFile {
    pub fn parse(parser: &mut GoParser, path: PathBuf, source: String) -> Result<Self> {
        let tree = parser.parse(&source)?;
        let root = tree.root_node();
        let package_name = extract_package_name(&root, &source);
        let imports = extract_imports(&root, &source);
        Ok(Self {
            path,
            source,
            tree,
            package_name,
            imports,
        })
    }

    /// Parse the file at `path`; invalid UTF-8 is replaced rather than
    /// rejected
    pub fn load(parser: &mut GoParser, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let source = String::from_utf8_lossy(&bytes).into_owned();
        Self::parse(parser, path.to_path_buf(), source)
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: &Node) -> &str {
        node_text(node, &self.source)
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    pub fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }

    pub fn has_syntax_errors(&self) -> bool {
        self.root().has_error()
    }

    /// The import bound to the identifier `local` in this file. Unaliased
    /// imports are bound to their package name, which `name_of` supplies.
    pub fn find_import(&self, local: &str, name_of: impl Fn(&str) -> String) -> Option<&ImportSpec> {
        self.imports
            .iter()
            .filter(|spec| spec.is_named_binding())
            .find(|spec| match &spec.alias {
                Some(alias) => alias == local,
                None => name_of(&spec.path) == local,
            })
    }
}

fn extract_package_name(root: &Node, source: &str) -> Option<String> {
    named_children(root)
        .into_iter()
        .find(|child| child.kind() == "package_clause")
        .and_then(|clause| {
            named_children(&clause)
                .into_iter()
                .find(|child| child.kind() == "package_identifier")
        })
        .map(|ident| node_text(&ident, source).to_string())
}

fn extract_imports(root: &Node, source: &str) -> Vec<ImportSpec> {
    let mut imports = Vec::new();
    for decl in named_children(root)
        .into_iter()
        .filter(|child| child.kind() == "import_declaration")
    {
        for child in named_children(&decl) {
            match child.kind() {
                "import_spec" => imports.extend(import_spec(&child, source)),
                "import_spec_list" => imports.extend(
                    named_children(&child)
                        .iter()
                        .filter(|spec| spec.kind() == "import_spec")
                        .filter_map(|spec| import_spec(spec, source)),
                ),
                _ => {}
            }
        }
    }
    imports
}

fn import_spec(node: &Node, source: &str) -> Option<ImportSpec> {
    let path = node.child_by_field_name("path")?;
    let path = node_text(&path, source)
        .trim_matches(|c| c == '"' || c == '`')
        .to_string();
    let alias = node
        .child_by_field_name("name")
        .map(|name| node_text(&name, source).to_string());
    Some(ImportSpec { alias, path })
}
