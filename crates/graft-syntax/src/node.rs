//! The tagged tree representation every other module operates on.
//!
//! A [`Node`] is an immutable value: `Null`, a [`Scalar`] leaf, an
//! [`Object`] with ordered named fields, or an `Array` of nodes. Field order
//! is preserved so reconstructed trees print deterministically.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Field carrying source-position metadata.
///
/// It is stripped before compilation and matching and never reintroduced
/// during construction.
pub const POSITION_FIELD: &str = "Pos";

/// Field holding the grammar kind of an object.
pub const KIND_FIELD: &str = "Kind";

/// Field holding the name of an identifier-like leaf.
pub const NAME_FIELD: &str = "Name";

/// Field holding the text of any other leaf.
pub const TEXT_FIELD: &str = "Text";

/// Field holding the ordered children of an interior node.
pub const CHILDREN_FIELD: &str = "Children";

/// A string, number or boolean leaf value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    Int(i64),
    /// A string value.
    Str(String),
}

impl Scalar {
    /// Returns the string payload, if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            Self::Bool(_) | Self::Int(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

/// An ordered mapping from field name to [`Node`].
///
/// Equality is mapping equality: two objects are equal when they carry the
/// same set of fields with equal values, whatever order they were built in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Object {
    fields: IndexMap<String, Node>,
}

impl Object {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field, returning the object for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to `value`.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Node>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Removes a field, returning its value if it was present.
    ///
    /// The remaining fields keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.fields.shift_remove(name)
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields.get(name)
    }

    /// Returns whether the object carries a field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the string value of a field, if present and a string scalar.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Node::as_str)
    }

    /// Iterates fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for Object {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, Node)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A tagged tree value.
///
/// Serialises as plain JSON: `Null` as `null`, scalars as themselves,
/// objects as maps and arrays as sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// The absent value.
    #[default]
    Null,
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered mapping of named fields.
    Object(Object),
    /// An ordered sequence of nodes.
    Array(Vec<Node>),
}

impl Node {
    /// Creates a string scalar node.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Str(value.into()))
    }

    /// Returns a short name for the node's variant, used in diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }

    /// Returns the object payload.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the array payload.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the string payload of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }

    /// Returns the `Kind` of an object node.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.as_object().and_then(|object| object.get_str(KIND_FIELD))
    }

    /// Removes the position field from this node and every descendant.
    #[must_use]
    pub fn strip_positions(self) -> Self {
        match self {
            Self::Object(object) => Self::Object(
                object
                    .fields
                    .into_iter()
                    .filter(|(name, _)| name != POSITION_FIELD)
                    .map(|(name, value)| (name, value.strip_positions()))
                    .collect(),
            ),
            Self::Array(items) => {
                Self::Array(items.into_iter().map(Self::strip_positions).collect())
            }
            leaf @ (Self::Null | Self::Scalar(_)) => leaf,
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Object> for Node {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Self>> for Node {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Int(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}
