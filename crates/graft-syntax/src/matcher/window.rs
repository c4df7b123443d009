//! The window matcher.
//!
//! A window is a fixed-length element sequence matched against a contiguous
//! slice of a longer array at an offset not known in advance. Every offset
//! trial runs on a fork of the caller's environment, so failed trials leave
//! nothing behind.
//!
//! - [`WindowMode::Single`] stops at the leftmost matching offset and records
//!   the untouched `left` and `right` segments.
//! - [`WindowMode::Multi`] scans left to right once, recording every
//!   non-overlapping match with its own environment and the `side` segments
//!   between them. Cost is `O(len(array) * len(window))`.
//!
//! Construction splices reconstructed windows back between the side
//! segments.

use tracing::trace;

use crate::environment::{Environment, WindowSlot};
use crate::error::SyntaxError;
use crate::matcher::check_elements;
use crate::node::Node;
use crate::pattern::{Window, WindowMode};

impl Window {
    /// Checks the window against `node`, recording its slot in `env`.
    pub(crate) fn check(&self, node: &Node, env: &mut Environment) -> bool {
        let Node::Array(items) = node else {
            return false;
        };
        if self.is_empty() || self.len() > items.len() {
            return false;
        }

        match self.mode() {
            WindowMode::Single => self.check_single(items, env),
            WindowMode::Multi => self.check_multi(items, env),
        }
    }

    /// Tries the window at `offset` on a fork of `env`.
    fn trial(&self, items: &[Node], offset: usize, env: &Environment) -> Option<Environment> {
        let end = offset.checked_add(self.len())?;
        let slice = items.get(offset..end)?;
        let mut fork = env.fork();
        let matched = check_elements(self.elements(), slice, &mut fork);
        trace!(offset, matched, "window trial");
        matched.then_some(fork)
    }

    fn check_single(&self, items: &[Node], env: &mut Environment) -> bool {
        let last_offset = items.len().saturating_sub(self.len());
        for offset in 0..=last_offset {
            let Some(fork) = self.trial(items, offset, env) else {
                continue;
            };

            let (left, rest) = items.split_at(offset);
            let right = rest.get(self.len()..).unwrap_or_default();
            env.merge(fork);
            return env.set_slot(WindowSlot::Single {
                left: left.to_vec(),
                right: right.to_vec(),
            });
        }

        false
    }

    fn check_multi(&self, items: &[Node], env: &mut Environment) -> bool {
        let mut sides = Vec::new();
        let mut matched = Vec::new();
        let mut cursor: usize = 0;
        let mut gap_start: usize = 0;

        while cursor.saturating_add(self.len()) <= items.len() {
            match self.trial(items, cursor, env) {
                Some(fork) => {
                    sides.push(items.get(gap_start..cursor).unwrap_or_default().to_vec());
                    matched.push(fork);
                    cursor = cursor.saturating_add(self.len());
                    gap_start = cursor;
                }
                None => cursor = cursor.saturating_add(1),
            }
        }
        sides.push(items.get(gap_start..).unwrap_or_default().to_vec());

        if matched.is_empty() {
            return false;
        }

        debug_assert_eq!(sides.len(), matched.len() + 1);
        env.set_slot(WindowSlot::Multi { sides, matched })
    }

    /// Rebuilds the whole array from the slot recorded by [`Window::check`].
    pub(crate) fn construct(&self, env: &Environment) -> Result<Node, SyntaxError> {
        match (self.mode(), env.slot()) {
            (WindowMode::Single, Some(WindowSlot::Single { left, right })) => {
                let mut result = left.clone();
                result.extend(self.construct_window(env)?);
                result.extend(right.iter().cloned());
                Ok(Node::Array(result))
            }
            (WindowMode::Multi, Some(WindowSlot::Multi { sides, matched })) => {
                let mut result = Vec::new();
                for (index, side) in sides.iter().enumerate() {
                    result.extend(side.iter().cloned());
                    if let Some(window_env) = matched.get(index) {
                        result.extend(self.construct_window(window_env)?);
                    }
                }
                Ok(Node::Array(result))
            }
            (WindowMode::Single, _) => Err(SyntaxError::UnboundWindow { slot: "left/right" }),
            (WindowMode::Multi, _) => Err(SyntaxError::UnboundWindow { slot: "side" }),
        }
    }

    /// Constructs the window's own elements.
    fn construct_window(&self, env: &Environment) -> Result<Vec<Node>, SyntaxError> {
        self.elements()
            .iter()
            .map(|element| element.construct(env))
            .collect()
    }
}
