use tree_sitter::Node;

/// Source text covered by `node`
pub fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Named children, skipping comments
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// All children bound to `field`
pub fn field_children<'t>(node: &Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Kinds of the anonymous tokens directly under `node`, in order
pub fn token_kinds(node: &Node) -> Vec<&'static str> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_named())
        .map(|child| child.kind())
        .collect()
}

/// First syntax error below `node` as `(row, column)`, zero-based
pub fn first_error(node: &Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let point = node.start_position();
        return Some((point.row, point.column));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.iter().find_map(first_error)
}
