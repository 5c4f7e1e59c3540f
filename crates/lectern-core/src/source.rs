/*
 * source.rs
 * Copyright (c) 2025 Lectern Developers
 */

//! Document sources: single-pass producers of [`Node`]s.

use std::collections::VecDeque;

use crate::error::Result;
use crate::node::Node;

/// A finite, non-restartable sequence of nodes.
pub trait DocumentSource {
    /// Return the next node, or `None` once the walk is exhausted.
    fn advance(&mut self) -> Result<Option<Node>>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for &mut S {
    fn advance(&mut self) -> Result<Option<Node>> {
        (**self).advance()
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn advance(&mut self) -> Result<Option<Node>> {
        (**self).advance()
    }
}

/// An in-memory document source over pre-built nodes.
#[derive(Debug, Default)]
pub struct NodeList {
    nodes: VecDeque<Node>,
}

impl NodeList {
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.nodes.len()
    }
}

impl DocumentSource for NodeList {
    fn advance(&mut self) -> Result<Option<Node>> {
        Ok(self.nodes.pop_front())
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_list_is_single_pass() {
        let mut source = NodeList::new(vec![Node::opening("a", 0), Node::closing("a", 0)]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.advance().unwrap().unwrap().name(), "a");
        assert!(source.advance().unwrap().unwrap().is_closing_element());
        assert!(source.advance().unwrap().is_none());
        assert!(source.advance().unwrap().is_none());
    }
}
