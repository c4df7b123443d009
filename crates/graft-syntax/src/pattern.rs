//! Pattern compilation for structural matching.
//!
//! A [`Pattern`] is compiled once from a concrete example [`Node`] and used
//! both to match other trees and, on the template side, to reconstruct them.
//!
//! # Capture rule
//!
//! An object whose `Kind` is one of the configured identifier-like kinds and
//! whose `Name` starts with the capture marker (`X` by default) compiles to a
//! [`Pattern::Capture`] named after the identifier. The capture replaces the
//! whole object, however deeply it is nested.

use crate::error::SyntaxError;
use crate::node::{KIND_FIELD, NAME_FIELD, Node, POSITION_FIELD};

/// Default prefix marking an identifier as a capture.
pub const DEFAULT_CAPTURE_MARKER: &str = "X";

/// A compiled, matchable and constructible pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches only a structurally equal node; reconstructs to it.
    Exact(Node),
    /// Matches anything; cannot be constructed.
    Wildcard,
    /// Matches anything and binds it to the given name.
    Capture(String),
    /// Matches an object whose declared fields satisfy their sub-patterns.
    Fields(Vec<FieldPattern>),
    /// Matches an array of exactly this length, element-wise.
    Sequence(Vec<Pattern>),
    /// Matches a fixed-length slice anywhere inside a longer array.
    Window(Window),
}

/// One declared field of a [`Pattern::Fields`] pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPattern {
    /// The field name.
    pub name: String,
    /// The pattern the field's value must satisfy.
    pub pattern: Pattern,
    /// Whether the field is omitted from reconstructed objects.
    pub drop: bool,
}

impl FieldPattern {
    /// Creates a field kept on reconstruction.
    #[must_use]
    pub fn keep(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            drop: false,
        }
    }

    /// Creates a field that must be present when matching but is dropped on
    /// reconstruction.
    #[must_use]
    pub fn dropped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: Pattern::Wildcard,
            drop: true,
        }
    }
}

/// How a [`Window`] scans its array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowMode {
    /// Stop at the leftmost matching offset.
    Single,
    /// Record every non-overlapping match, left to right.
    Multi,
}

/// A fixed-length element sequence matched at a variable offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    elements: Vec<Pattern>,
    mode: WindowMode,
}

impl Window {
    /// Returns the element patterns of the window.
    #[must_use]
    pub fn elements(&self) -> &[Pattern] {
        &self.elements
    }

    /// Returns the scan mode.
    #[must_use]
    pub const fn mode(&self) -> WindowMode {
        self.mode
    }

    /// Returns the number of elements a match spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the window has no elements.
    ///
    /// An empty window never matches; as a template it deletes every match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Pattern {
    /// Re-wraps a compiled sequence as a window.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnsupportedNodeKind`] if the pattern is not a
    /// [`Pattern::Sequence`].
    pub fn into_window(self, mode: WindowMode) -> Result<Self, SyntaxError> {
        match self {
            Self::Sequence(elements) => Ok(Self::Window(Window { elements, mode })),
            other => Err(SyntaxError::unsupported_node_kind(format!(
                "window over {}",
                other.variant_name()
            ))),
        }
    }

    /// Returns a short name for the pattern's variant, used in diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Wildcard => "wildcard",
            Self::Capture(_) => "capture",
            Self::Fields(_) => "fields",
            Self::Sequence(_) => "sequence",
            Self::Window(_) => "window",
        }
    }

    /// Collects capture names in pre-order, duplicates included.
    #[must_use]
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_capture_names(&mut names);
        names
    }

    fn collect_capture_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Capture(name) => names.push(name),
            Self::Fields(fields) => {
                for field in fields {
                    field.pattern.collect_capture_names(names);
                }
            }
            Self::Sequence(elements) => {
                for element in elements {
                    element.collect_capture_names(names);
                }
            }
            Self::Window(window) => {
                for element in &window.elements {
                    element.collect_capture_names(names);
                }
            }
            Self::Exact(_) | Self::Wildcard => {}
        }
    }
}

/// Decides which objects compile to captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRule {
    marker: String,
    identifier_kinds: Vec<String>,
}

impl CaptureRule {
    /// Creates a rule from a marker prefix and the identifier-like kinds.
    #[must_use]
    pub fn new<I, S>(marker: impl Into<String>, identifier_kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            marker: marker.into(),
            identifier_kinds: identifier_kinds.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the marker prefix.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns the capture name for `node`, if it is a marked identifier.
    #[must_use]
    pub fn capture_name<'n>(&self, node: &'n Node) -> Option<&'n str> {
        let object = node.as_object()?;
        let kind = object.get_str(KIND_FIELD)?;
        if !self.identifier_kinds.iter().any(|candidate| candidate == kind) {
            return None;
        }
        object
            .get_str(NAME_FIELD)
            .filter(|name| !self.marker.is_empty() && name.starts_with(self.marker.as_str()))
    }
}

impl Default for CaptureRule {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_MARKER, ["identifier"])
    }
}

/// Turns concrete nodes into patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternCompiler {
    rule: CaptureRule,
}

impl PatternCompiler {
    /// Creates a compiler using the given capture rule.
    #[must_use]
    pub const fn new(rule: CaptureRule) -> Self {
        Self { rule }
    }

    /// Returns the capture rule in use.
    #[must_use]
    pub const fn rule(&self) -> &CaptureRule {
        &self.rule
    }

    /// Compiles a node into a pattern.
    ///
    /// Scalars and `Null` become [`Pattern::Exact`], marked identifiers
    /// become [`Pattern::Capture`], other objects become [`Pattern::Fields`]
    /// with the position field dropped, and arrays become
    /// [`Pattern::Sequence`].
    #[must_use]
    pub fn compile(&self, node: &Node) -> Pattern {
        if let Some(name) = self.rule.capture_name(node) {
            return Pattern::Capture(name.to_owned());
        }

        match node {
            Node::Null | Node::Scalar(_) => Pattern::Exact(node.clone()),
            Node::Object(object) => Pattern::Fields(
                object
                    .iter()
                    .map(|(name, value)| {
                        if name == POSITION_FIELD {
                            FieldPattern::dropped(name)
                        } else {
                            FieldPattern::keep(name, self.compile(value))
                        }
                    })
                    .collect(),
            ),
            Node::Array(items) => {
                Pattern::Sequence(items.iter().map(|item| self.compile(item)).collect())
            }
        }
    }
}
