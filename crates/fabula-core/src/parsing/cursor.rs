// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bidirectional node cursor.
//!
//! The parser walks the lexed node sequence through a [`NodeCursor`]: a
//! value type over an immutable slice. Cloning a cursor yields an
//! independent position into the same sequence, which is how backward
//! tag collection peeks behind the current node without disturbing the
//! main walk.

use crate::lexing::Node;

/// A position within a node sequence.
///
/// A fresh cursor sits *before* the first node; the first
/// [`next`](Self::next) call lands on it. All operations are O(1) and
/// none of them mutate the sequence.
#[derive(Debug, Clone)]
pub struct NodeCursor<'a> {
    nodes: &'a [Node],
    /// `None` while before the first node.
    index: Option<usize>,
}

impl<'a> NodeCursor<'a> {
    /// Creates a cursor positioned before the first node.
    #[must_use]
    pub fn new(nodes: &'a [Node]) -> Self {
        Self { nodes, index: None }
    }

    /// The node under the cursor, if it has moved onto one.
    #[must_use]
    pub fn current(&self) -> Option<&'a Node> {
        self.nodes.get(self.index?)
    }

    /// True when a forward move would land on a node.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match self.index {
            None => !self.nodes.is_empty(),
            Some(index) => index + 1 < self.nodes.len(),
        }
    }

    /// Moves forward and returns the node moved onto.
    pub fn next(&mut self) -> Option<&'a Node> {
        if !self.has_next() {
            return None;
        }
        let index = self.index.map_or(0, |i| i + 1);
        self.index = Some(index);
        self.nodes.get(index)
    }

    /// The node a forward move would land on, without moving.
    #[must_use]
    pub fn spy_next(&self) -> Option<&'a Node> {
        let index = self.index.map_or(0, |i| i + 1);
        self.nodes.get(index)
    }

    /// True when a backward move would land on a node.
    #[must_use]
    pub fn has_prior(&self) -> bool {
        self.index.is_some_and(|index| index > 0)
    }

    /// Moves backward and returns the node moved onto.
    pub fn prior(&mut self) -> Option<&'a Node> {
        let index = self.index?.checked_sub(1)?;
        self.index = Some(index);
        self.nodes.get(index)
    }

    /// The node a backward move would land on, without moving.
    #[must_use]
    pub fn spy_prior(&self) -> Option<&'a Node> {
        self.nodes.get(self.index?.checked_sub(1)?)
    }

    /// Rebinds the cursor to a new sequence, rewound to before-first.
    pub fn replace(&mut self, nodes: &'a [Node]) {
        self.nodes = nodes;
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::{Location, NodePayload};
    use proptest::prelude::*;

    fn nodes(count: usize) -> Vec<Node> {
        (0..count)
            .map(|i| {
                Node::new(
                    Location::new(i as u32 + 1, 1),
                    NodePayload::Text {
                        content: format!("line {i}").into(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn starts_before_first() {
        let seq = nodes(2);
        let cursor = NodeCursor::new(&seq);
        assert!(cursor.current().is_none());
        assert!(cursor.has_next());
        assert!(!cursor.has_prior());
        assert_eq!(cursor.spy_next(), Some(&seq[0]));
    }

    #[test]
    fn walks_forward_and_back() {
        let seq = nodes(3);
        let mut cursor = NodeCursor::new(&seq);
        assert_eq!(cursor.next(), Some(&seq[0]));
        assert_eq!(cursor.next(), Some(&seq[1]));
        assert_eq!(cursor.next(), Some(&seq[2]));
        assert!(!cursor.has_next());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.current(), Some(&seq[2]));

        assert_eq!(cursor.prior(), Some(&seq[1]));
        assert_eq!(cursor.spy_prior(), Some(&seq[0]));
        assert_eq!(cursor.prior(), Some(&seq[0]));
        assert!(!cursor.has_prior());
        assert_eq!(cursor.prior(), None);
        assert_eq!(cursor.current(), Some(&seq[0]));
    }

    #[test]
    fn spy_does_not_move() {
        let seq = nodes(2);
        let mut cursor = NodeCursor::new(&seq);
        cursor.next();
        let before = cursor.current();
        assert_eq!(cursor.spy_next(), Some(&seq[1]));
        assert_eq!(cursor.spy_prior(), None);
        assert_eq!(cursor.current(), before);
    }

    #[test]
    fn empty_sequence_has_nothing() {
        let seq = nodes(0);
        let mut cursor = NodeCursor::new(&seq);
        assert!(!cursor.has_next());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.spy_next(), None);
    }

    #[test]
    fn replace_rebinds_and_rewinds() {
        let first = nodes(2);
        let second = nodes(1);
        let mut cursor = NodeCursor::new(&first);
        cursor.next();
        cursor.replace(&second);
        assert!(cursor.current().is_none());
        assert_eq!(cursor.next(), Some(&second[0]));
        assert!(!cursor.has_next());
    }

    #[test]
    fn clone_moves_independently() {
        let seq = nodes(3);
        let mut cursor = NodeCursor::new(&seq);
        cursor.next();

        let mut scout = cursor.clone();
        scout.next();
        scout.next();
        assert_eq!(scout.current(), Some(&seq[2]));
        assert_eq!(cursor.current(), Some(&seq[0]));

        scout.prior();
        scout.prior();
        assert_eq!(cursor.current(), Some(&seq[0]));
    }

    proptest! {
        /// A cloned cursor's movement never changes the original's
        /// position, for any interleaving of moves.
        #[test]
        fn clone_is_isolated(len in 0usize..8, moves in prop::collection::vec(any::<bool>(), 0..32)) {
            let seq = nodes(len);
            let mut original = NodeCursor::new(&seq);
            original.next();
            let before = original.current();

            let mut clone = original.clone();
            for forward in moves {
                if forward {
                    clone.next();
                } else {
                    clone.prior();
                }
            }
            prop_assert_eq!(original.current(), before);
        }

        /// Forward then backward returns to the same node.
        #[test]
        fn next_then_prior_round_trips(len in 2usize..8, steps in 1usize..6) {
            let seq = nodes(len);
            let mut cursor = NodeCursor::new(&seq);
            for _ in 0..steps.min(len) {
                cursor.next();
            }
            let here = cursor.current();
            if cursor.next().is_some() {
                cursor.prior();
                prop_assert_eq!(cursor.current(), here);
            }
        }
    }
}
