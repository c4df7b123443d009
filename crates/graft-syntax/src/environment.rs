//! Variable bindings threaded through matching and construction.
//!
//! An [`Environment`] maps capture names to the nodes they matched and holds
//! the reserved window slot filled by the window matcher. Speculative
//! matching always happens on a [`fork`](Environment::fork); only a
//! successful fork is [`merge`](Environment::merge)d back.

use std::collections::BTreeMap;

use crate::node::Node;

/// Bookkeeping recorded by a successful window match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSlot {
    /// First-occurrence match: the untouched segments around the window.
    Single {
        /// Elements before the matched window.
        left: Vec<Node>,
        /// Elements after the matched window.
        right: Vec<Node>,
    },
    /// All non-overlapping matches.
    ///
    /// `sides` always holds exactly one more segment than `matched`.
    Multi {
        /// Untouched segments before, between and after the matches.
        sides: Vec<Vec<Node>>,
        /// One environment per matched window, in array order.
        matched: Vec<Environment>,
    },
}

impl WindowSlot {
    /// Returns the number of matched windows recorded.
    #[must_use]
    pub fn match_count(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Multi { matched, .. } => matched.len(),
        }
    }
}

/// Capture bindings plus the reserved window slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    bindings: BTreeMap<String, Node>,
    window: Option<WindowSlot>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            window: None,
        }
    }

    /// Binds `name` to `node`.
    ///
    /// Bindings are write-once. Returns `false`, leaving the environment
    /// untouched, when `name` is already bound, even to an equal node.
    pub fn bind(&mut self, name: &str, node: Node) -> bool {
        if self.bindings.contains_key(name) {
            return false;
        }
        self.bindings.insert(name.to_owned(), node);
        true
    }

    /// Returns the node bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.bindings.get(name)
    }

    /// Iterates bindings in name order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.bindings.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Returns whether no capture is bound and no window slot is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.window.is_none()
    }

    /// Returns an independent copy for speculative matching.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Adopts every binding of a successful fork.
    ///
    /// The fork's values win. A fork only ever extends the bindings it was
    /// created from, so no conflicting names arise in practice.
    pub fn merge(&mut self, child: Self) {
        for (name, node) in child.bindings {
            debug_assert!(
                self.bindings.get(&name).is_none_or(|existing| *existing == node),
                "merged fork rebinds {name} to a different node"
            );
            self.bindings.insert(name, node);
        }
        if child.window.is_some() {
            self.window = child.window;
        }
    }

    /// Records window bookkeeping.
    ///
    /// Like captures, the slot is write-once: returns `false` if it is
    /// already set.
    pub fn set_slot(&mut self, slot: WindowSlot) -> bool {
        if self.window.is_some() {
            return false;
        }
        self.window = Some(slot);
        true
    }

    /// Returns the window bookkeeping, if a window matched.
    #[must_use]
    pub const fn slot(&self) -> Option<&WindowSlot> {
        self.window.as_ref()
    }
}
