//! The task forest: queries and structure-sharing mutations.
//!
//! A [`Forest`] is an immutable value. Every mutation returns a new forest in
//! which only the nodes on the path from a root to the changed node are
//! rebuilt; all other subtrees are the very same [`NodeRef`] allocations as in
//! the input. Addressing a node that does not exist is a silent no-op: the
//! result is a clone of the input sharing every root.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::domain::id::NodeId;
use crate::domain::node::{Node, NodeRef};
use crate::domain::traverse::{LeafPaths, Nodes};

/// Ordered sequence of top-level task nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<NodeRef>,
}

impl Forest {
    /// The empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes at all levels.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| root.subtree_len()).sum()
    }

    /// Number of levels (0 for the empty forest).
    pub fn depth(&self) -> usize {
        self.roots.iter().map(|root| root.depth()).max().unwrap_or(0)
    }

    /// Pre-order walk over all nodes with their depth.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes::new(&self.roots)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Resolve a node by an explicit id path: root id, child id, grandchild id...
    ///
    /// Returns `None` for an empty path or as soon as a segment does not
    /// resolve among the children of the previous one.
    pub fn find_at(&self, path: &[NodeId]) -> Option<&NodeRef> {
        let (first, rest) = path.split_first()?;
        let mut current = self.roots.iter().find(|node| node.id() == first)?;
        for id in rest {
            current = current.children().iter().find(|node| node.id() == id)?;
        }
        Some(current)
    }

    /// First depth-first match for `id` at any level.
    pub fn find(&self, id: &NodeId) -> Option<&NodeRef> {
        self.iter()
            .find(|(_, node)| node.id() == id)
            .map(|(_, node)| node)
    }

    /// Ids from the root down to `id` (inclusive).
    pub fn path_to(&self, id: &NodeId) -> Option<Vec<NodeId>> {
        fn walk(nodes: &[NodeRef], id: &NodeId, path: &mut Vec<NodeId>) -> bool {
            for node in nodes {
                path.push(*node.id());
                if node.id() == id || walk(node.children(), id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        walk(&self.roots, id, &mut path).then_some(path)
    }

    /// Depth of `id` (roots are at depth 0).
    pub fn depth_of(&self, id: &NodeId) -> Option<usize> {
        self.path_to(id).map(|path| path.len() - 1)
    }

    /// Parent of `id`; `Some(None)` for a root, `None` if `id` is unknown.
    pub fn parent_of(&self, id: &NodeId) -> Option<Option<NodeId>> {
        let path = self.path_to(id)?;
        Some(path.len().checked_sub(2).map(|idx| path[idx]))
    }

    /// Every root-to-terminal chain, depth-first and left to right.
    ///
    /// Each call starts a fresh traversal of this snapshot.
    pub fn leaf_paths(&self) -> LeafPaths<'_> {
        LeafPaths::new(&self.roots)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Append `node` after the last root.
    pub fn append_root(&self, node: Node) -> Forest {
        debug!("append_root: {}", node);
        let mut roots = self.roots.clone();
        roots.push(Rc::new(node));
        Forest { roots }
    }

    /// Append a freshly created node to the children of `parent_id`.
    pub fn append_child(&self, parent_id: &NodeId, title: Option<&str>) -> Forest {
        self.append_child_node(parent_id, Node::create(title))
    }

    /// Append `node` to the children of `parent_id`, at any depth.
    pub fn append_child_node(&self, parent_id: &NodeId, node: Node) -> Forest {
        debug!("append_child_node: parent={} node={}", parent_id, node);
        let mut pending = Some(node);
        self.updated(parent_id, |parent| {
            let mut children = parent.children().to_vec();
            children.extend(pending.take().map(Rc::new));
            parent.with_children(children)
        })
    }

    /// Insert a freshly created node right after `anchor_id` among the
    /// children of `parent_id` (`None` addresses the roots).
    pub fn insert_sibling_after(
        &self,
        parent_id: Option<&NodeId>,
        anchor_id: &NodeId,
        title: Option<&str>,
    ) -> Forest {
        self.insert_sibling_node_after(parent_id, anchor_id, Node::create(title))
    }

    /// Insert `node` right after `anchor_id` among the children of
    /// `parent_id` (`None` addresses the roots).
    pub fn insert_sibling_node_after(
        &self,
        parent_id: Option<&NodeId>,
        anchor_id: &NodeId,
        node: Node,
    ) -> Forest {
        debug!(
            "insert_sibling_node_after: parent={:?} anchor={} node={}",
            parent_id.map(|id| id.to_string()),
            anchor_id,
            node
        );
        let Some(parent_id) = parent_id else {
            return match inserted_after(&self.roots, anchor_id, node) {
                Some(roots) => Forest { roots },
                None => {
                    trace!("anchor {} not among roots", anchor_id);
                    self.clone()
                }
            };
        };

        let anchored = self
            .find(parent_id)
            .is_some_and(|parent| parent.children().iter().any(|c| c.id() == anchor_id));
        if !anchored {
            trace!("anchor {} not under parent {}", anchor_id, parent_id);
            return self.clone();
        }

        let mut pending = Some(node);
        self.updated(parent_id, |parent| {
            let children = pending
                .take()
                .and_then(|node| inserted_after(parent.children(), anchor_id, node));
            match children {
                Some(children) => parent.with_children(children),
                None => parent.clone(),
            }
        })
    }

    /// Replace the title of `id`, wherever it is.
    pub fn rename_node(&self, id: &NodeId, title: &str) -> Forest {
        debug!("rename_node: id={} title={:?}", id, title);
        self.updated(id, |node| node.with_title(title))
    }

    /// Apply `edit` to `id` and rebuild its ancestors, or clone on a miss.
    fn updated<F>(&self, id: &NodeId, mut edit: F) -> Forest
    where
        F: FnMut(&Node) -> Node,
    {
        match update_node(&self.roots, id, &mut edit) {
            Some(roots) => Forest { roots },
            None => {
                trace!("node {} not found, forest unchanged", id);
                self.clone()
            }
        }
    }
}

/// Map over `nodes`, replacing the first depth-first match for `id` with
/// `edit(match)` and rebuilding only its ancestors.
///
/// Returns `None` when `id` is not in `nodes`; every sibling subtree off the
/// path is reused as-is.
pub fn update_node<F>(nodes: &[NodeRef], id: &NodeId, edit: &mut F) -> Option<Vec<NodeRef>>
where
    F: FnMut(&Node) -> Node,
{
    for (idx, node) in nodes.iter().enumerate() {
        let replacement = if node.id() == id {
            Some(edit(node))
        } else {
            update_node(node.children(), id, edit).map(|children| node.with_children(children))
        };
        if let Some(replacement) = replacement {
            let mut updated = nodes.to_vec();
            updated[idx] = Rc::new(replacement);
            return Some(updated);
        }
    }
    None
}

fn inserted_after(nodes: &[NodeRef], anchor_id: &NodeId, node: Node) -> Option<Vec<NodeRef>> {
    let pos = nodes.iter().position(|n| n.id() == anchor_id)?;
    let mut updated = nodes.to_vec();
    updated.insert(pos + 1, Rc::new(node));
    Some(updated)
}
