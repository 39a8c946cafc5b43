//! Iterators over a forest snapshot.
//!
//! Both iterators borrow the forest and keep their own explicit stack, so a
//! new call always starts from the top and never disturbs the forest.

use crate::domain::node::{Node, NodeRef};

/// Pre-order, left-to-right walk yielding `(depth, node)`.
pub struct Nodes<'a> {
    stack: Vec<(usize, &'a NodeRef)>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(roots: &'a [NodeRef]) -> Self {
        Self {
            stack: roots.iter().rev().map(|root| (0, root)).collect(),
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (usize, &'a NodeRef);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children().iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

/// One maximal chain from a root down to a node without children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPath<'a> {
    nodes: Vec<&'a NodeRef>,
}

impl<'a> LeafPath<'a> {
    /// Top-level node of the chain.
    pub fn root(&self) -> &'a Node {
        self.nodes[0]
    }

    /// Second node of the chain, if the chain has one.
    pub fn middle(&self) -> Option<&'a Node> {
        self.nodes.get(1).map(|&node| &**node)
    }

    /// Terminal node when the chain has at least three levels.
    pub fn leaf(&self) -> Option<&'a Node> {
        if self.nodes.len() >= 3 {
            Some(self.terminal())
        } else {
            None
        }
    }

    /// Last node of the chain; it has no children.
    pub fn terminal(&self) -> &'a Node {
        self.nodes[self.nodes.len() - 1]
    }

    /// Full chain, root first.
    pub fn nodes(&self) -> &[&'a NodeRef] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a chain holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lazy enumeration of every [`LeafPath`] in depth-first, left-to-right order.
pub struct LeafPaths<'a> {
    stack: Vec<(usize, &'a NodeRef)>,
    chain: Vec<&'a NodeRef>,
}

impl<'a> LeafPaths<'a> {
    pub(crate) fn new(roots: &'a [NodeRef]) -> Self {
        Self {
            stack: roots.iter().rev().map(|root| (0, root)).collect(),
            chain: Vec::new(),
        }
    }
}

impl<'a> Iterator for LeafPaths<'a> {
    type Item = LeafPath<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, node)) = self.stack.pop() {
            self.chain.truncate(depth);
            self.chain.push(node);
            if node.is_leaf() {
                return Some(LeafPath {
                    nodes: self.chain.clone(),
                });
            }
            for child in node.children().iter().rev() {
                self.stack.push((depth + 1, child));
            }
        }
        None
    }
}
