//! Position metadata for bridged nodes.
//!
//! Tree-sitter positions are zero-based; `Pos` fields and error messages use
//! one-based line and column numbers.

use crate::node::{Node, Object};

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    // Line/column numbers will realistically never exceed u32::MAX.
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}

fn point_to_node(pos: tree_sitter::Point) -> Node {
    let (line, column) = point_to_one_based(pos);
    Object::new()
        .with("Line", i64::from(line))
        .with("Column", i64::from(column))
        .into()
}

/// Builds the `Pos` value spanning a Tree-sitter node.
#[must_use]
pub(crate) fn span_of(node: tree_sitter::Node<'_>) -> Node {
    Object::new()
        .with("Start", point_to_node(node.start_position()))
        .with("End", point_to_node(node.end_position()))
        .into()
}
