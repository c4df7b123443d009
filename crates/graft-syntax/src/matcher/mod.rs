//! Structural matching and construction.
//!
//! [`Pattern::check`] tests a pattern against a node, binding captures into an
//! [`Environment`]; a mismatch is a plain `false`, never an error.
//! [`Pattern::construct`] rebuilds a node from a pattern and the bindings a
//! successful check produced. Window patterns are handled by the window
//! matcher in [`window`].

mod window;

use crate::environment::Environment;
use crate::error::SyntaxError;
use crate::node::{Node, Object};
use crate::pattern::{FieldPattern, Pattern};

impl Pattern {
    /// Checks whether `node` satisfies this pattern, binding captures in
    /// `env`.
    ///
    /// Failed checks may leave partial bindings behind; callers that need
    /// rollback check against a [`fork`](Environment::fork).
    pub fn check(&self, node: &Node, env: &mut Environment) -> bool {
        match self {
            Self::Exact(expected) => expected == node,
            Self::Wildcard => true,
            Self::Capture(name) => env.bind(name, node.clone()),
            Self::Fields(fields) => check_fields(fields, node, env),
            Self::Sequence(elements) => match node {
                Node::Array(items) => check_elements(elements, items, env),
                _ => false,
            },
            Self::Window(window) => window.check(node, env),
        }
    }

    /// Reconstructs a node from this pattern and the bindings in `env`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnboundVariable`] for captures missing from
    /// `env`, [`SyntaxError::ConstructFromWildcard`] for wildcards, and
    /// [`SyntaxError::UnboundWindow`] for windows without match bookkeeping.
    pub fn construct(&self, env: &Environment) -> Result<Node, SyntaxError> {
        match self {
            Self::Exact(node) => Ok(node.clone()),
            Self::Wildcard => Err(SyntaxError::ConstructFromWildcard),
            Self::Capture(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| SyntaxError::unbound_variable(name.as_str())),
            Self::Fields(fields) => construct_fields(fields, env),
            Self::Sequence(elements) => elements
                .iter()
                .map(|element| element.construct(env))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Array),
            Self::Window(window) => window.construct(env),
        }
    }
}

/// Checks an object against declared fields; undeclared fields are ignored.
fn check_fields(fields: &[FieldPattern], node: &Node, env: &mut Environment) -> bool {
    let Node::Object(object) = node else {
        return false;
    };

    fields.iter().all(|field| match object.get(&field.name) {
        Some(value) => field.pattern.check(value, env),
        None => matches!(field.pattern, Pattern::Wildcard),
    })
}

/// Checks `items` position by position; lengths must agree.
pub(crate) fn check_elements(elements: &[Pattern], items: &[Node], env: &mut Environment) -> bool {
    elements.len() == items.len()
        && elements
            .iter()
            .zip(items)
            .all(|(element, item)| element.check(item, env))
}

fn construct_fields(fields: &[FieldPattern], env: &Environment) -> Result<Node, SyntaxError> {
    let mut object = Object::new();
    for field in fields.iter().filter(|field| !field.drop) {
        object.insert(field.name.as_str(), field.pattern.construct(env)?);
    }
    Ok(Node::Object(object))
}

/// A subtree that satisfied a pattern, with the bindings it produced.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    node: &'a Node,
    env: Environment,
}

impl<'a> MatchResult<'a> {
    /// Returns the matched subtree.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.node
    }

    /// Returns the bindings produced by the match.
    #[must_use]
    pub const fn env(&self) -> &Environment {
        &self.env
    }

    /// Gets a captured node by name.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&Node> {
        self.env.get(name)
    }

    /// Consumes the result, returning its bindings.
    #[must_use]
    pub fn into_env(self) -> Environment {
        self.env
    }
}

/// Finds the subtrees of a tree that satisfy a pattern.
pub struct Matcher<'p> {
    pattern: &'p Pattern,
}

impl<'p> Matcher<'p> {
    /// Creates a new matcher for the given pattern.
    #[must_use]
    pub const fn new(pattern: &'p Pattern) -> Self {
        Self { pattern }
    }

    /// Finds every matching subtree in pre-order, each with a fresh
    /// environment.
    #[must_use]
    pub fn find_all<'a>(&self, tree: &'a Node) -> Vec<MatchResult<'a>> {
        let mut results = Vec::new();
        self.find_recursive(tree, &mut results, false);
        results
    }

    /// Finds the first matching subtree in pre-order.
    #[must_use]
    pub fn find_first<'a>(&self, tree: &'a Node) -> Option<MatchResult<'a>> {
        let mut results = Vec::new();
        self.find_recursive(tree, &mut results, true);
        results.pop()
    }

    fn find_recursive<'a>(&self, node: &'a Node, results: &mut Vec<MatchResult<'a>>, first: bool) {
        let mut env = Environment::new();
        if self.pattern.check(node, &mut env) {
            results.push(MatchResult { node, env });
            if first {
                return;
            }
        }

        let children: Vec<&'a Node> = match node {
            Node::Object(object) => object.iter().map(|(_, value)| value).collect(),
            Node::Array(items) => items.iter().collect(),
            Node::Null | Node::Scalar(_) => return,
        };
        for child in children {
            self.find_recursive(child, results, first);
            if first && !results.is_empty() {
                return;
            }
        }
    }
}

impl Pattern {
    /// Finds every subtree of `tree` matching this pattern.
    #[must_use]
    pub fn find_all<'a>(&self, tree: &'a Node) -> Vec<MatchResult<'a>> {
        Matcher::new(self).find_all(tree)
    }

    /// Finds the first subtree of `tree` matching this pattern.
    #[must_use]
    pub fn find_first<'a>(&self, tree: &'a Node) -> Option<MatchResult<'a>> {
        Matcher::new(self).find_first(tree)
    }
}

#[cfg(test)]
mod tests;
