//! Task nodes and the node factory.

use std::fmt;
use std::rc::Rc;

use crate::domain::id::NodeId;

/// Title used when a node is created without one.
pub const DEFAULT_NODE_TITLE: &str = "New task";

/// Shared handle to an immutable node.
///
/// Forests share unchanged subtrees between versions through this handle.
pub type NodeRef = Rc<Node>;

/// A titled task with an ordered list of child tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    title: String,
    children: Vec<NodeRef>,
}

impl Node {
    /// Create a node with a fresh id and no children.
    pub fn create(title: Option<&str>) -> Self {
        Self {
            id: NodeId::new(),
            title: title.unwrap_or(DEFAULT_NODE_TITLE).to_string(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Display title; may be empty.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }

    /// Number of levels in this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Copy of this node with another title; children stay shared.
    pub(crate) fn with_title(&self, title: &str) -> Self {
        Self {
            id: self.id,
            title: title.to_string(),
            children: self.children.clone(),
        }
    }

    /// Copy of this node with a replaced child list.
    pub(crate) fn with_children(&self, children: Vec<NodeRef>) -> Self {
        Self {
            id: self.id,
            title: self.title.clone(),
            children,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id.short())
    }
}

/// Node factory: a fresh childless node, titled [`DEFAULT_NODE_TITLE`] when
/// `title` is `None`.
pub fn create_node(title: Option<&str>) -> Node {
    Node::create(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_title_when_creating_then_uses_placeholder() {
        let node = create_node(None);
        assert_eq!(node.title(), DEFAULT_NODE_TITLE);
        assert!(node.is_leaf());
    }

    #[test]
    fn given_empty_title_when_creating_then_keeps_empty_title() {
        let node = create_node(Some(""));
        assert_eq!(node.title(), "");
    }

    #[test]
    fn given_two_nodes_when_created_then_ids_differ() {
        assert_ne!(create_node(None).id(), create_node(None).id());
    }

    #[test]
    fn given_node_when_retitled_then_id_and_children_are_kept() {
        let child = Rc::new(create_node(Some("child")));
        let node = create_node(Some("parent")).with_children(vec![Rc::clone(&child)]);

        let renamed = node.with_title("renamed");

        assert_eq!(renamed.id(), node.id());
        assert_eq!(renamed.title(), "renamed");
        assert!(Rc::ptr_eq(&renamed.children()[0], &child));
    }

    #[test]
    fn given_nested_nodes_when_measuring_then_depth_and_len_match() {
        let grandchild = Rc::new(create_node(Some("g")));
        let child = Rc::new(create_node(Some("c")).with_children(vec![grandchild]));
        let root = create_node(Some("r")).with_children(vec![child, Rc::new(create_node(None))]);

        assert_eq!(root.depth(), 3);
        assert_eq!(root.subtree_len(), 4);
    }
}
