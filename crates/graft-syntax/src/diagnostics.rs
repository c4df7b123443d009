//! Diagnostic sinks for inspecting intermediate trees.
//!
//! The rewriter hands every tree it compiles, matches or produces to a
//! [`DiagnosticSink`] together with a short label (`before`, `after`,
//! `input`, `output`). Sinks are passed in explicitly through
//! [`RewriteOptions`](crate::RewriteOptions); nothing is dumped unless a
//! caller asks for it.

use tracing::debug;

use crate::error::SyntaxError;
use crate::node::Node;

/// Receives labelled trees for troubleshooting.
pub trait DiagnosticSink: Send + Sync {
    /// Records `node` under `label`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::DiagnosticError`] if the tree cannot be
    /// recorded.
    fn dump(&self, label: &str, node: &Node) -> Result<(), SyntaxError>;
}

/// Discards every tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn dump(&self, _label: &str, _node: &Node) -> Result<(), SyntaxError> {
        Ok(())
    }
}

/// Emits every tree as a JSON `debug!` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn dump(&self, label: &str, node: &Node) -> Result<(), SyntaxError> {
        let tree = to_pretty_json(node)?;
        debug!(label, tree = %tree, "diagnostic tree");
        Ok(())
    }
}

/// Serialises a tree as indented JSON, keeping field order.
///
/// # Errors
///
/// Returns [`SyntaxError::DiagnosticError`] if serialisation fails.
pub fn to_pretty_json(node: &Node) -> Result<String, SyntaxError> {
    serde_json::to_string_pretty(node).map_err(|err| SyntaxError::diagnostic(err.to_string()))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::node::{KIND_FIELD, NAME_FIELD, Object};

    #[test]
    fn pretty_json_keeps_field_order() {
        let node: Node = Object::new()
            .with(KIND_FIELD, "identifier")
            .with(NAME_FIELD, "Xa")
            .into();
        assert_snapshot!(to_pretty_json(&node).expect("json"), @r#"
        {
          "Kind": "identifier",
          "Name": "Xa"
        }
        "#);
    }

    #[test]
    fn builtin_sinks_accept_any_tree() {
        let node = Node::Array(vec![Node::Null]);
        assert!(NoopSink.dump("input", &node).is_ok());
        assert!(TracingSink.dump("input", &node).is_ok());
    }
}
