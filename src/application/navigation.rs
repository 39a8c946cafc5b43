//! Screen navigation over a forest snapshot.
//!
//! Screens address nodes by id. When an id no longer resolves, the screen
//! falls back to a neighbouring view instead of failing.

use crate::domain::{Forest, NodeId};

/// Where a request for the root/middle screen ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Both ids resolve: show the middle node and its children.
    Show { root: NodeId, middle: NodeId },
    /// Middle id is stale: go to the root's first child instead.
    Redirect { root: NodeId, middle: NodeId },
    /// Back to the top-level overview, optionally selecting a root.
    Overview { selected_root: Option<NodeId> },
}

/// Resolve the focus for a `(root, middle)` screen address.
pub fn resolve_focus(forest: &Forest, root_id: &NodeId, middle_id: &NodeId) -> Focus {
    let Some(root) = forest.find_at(&[*root_id]) else {
        return Focus::Overview {
            selected_root: None,
        };
    };
    if forest.find_at(&[*root_id, *middle_id]).is_some() {
        return Focus::Show {
            root: *root_id,
            middle: *middle_id,
        };
    }
    match root.children().first() {
        Some(first) => Focus::Redirect {
            root: *root_id,
            middle: *first.id(),
        },
        None => Focus::Overview {
            selected_root: Some(*root_id),
        },
    }
}

/// Keep a root selection valid for `forest`.
///
/// An empty forest has no selection; a missing or stale selection falls back
/// to the first root.
pub fn reconcile_selection(forest: &Forest, selected: Option<NodeId>) -> Option<NodeId> {
    let first = forest.roots().first().map(|root| *root.id());
    match selected {
        Some(id) if forest.find_at(&[id]).is_some() => Some(id),
        _ => first,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::create_node;

    fn forest_with_root() -> (Forest, NodeId) {
        let root = create_node(Some("root"));
        let id = *root.id();
        (Forest::new().append_root(root), id)
    }

    #[test]
    fn given_missing_root_when_resolving_then_overview_without_selection() {
        let (forest, _) = forest_with_root();
        let focus = resolve_focus(&forest, &NodeId::new(), &NodeId::new());
        assert_eq!(
            focus,
            Focus::Overview {
                selected_root: None
            }
        );
    }

    #[test]
    fn given_childless_root_when_resolving_then_overview_selecting_root() {
        let (forest, root) = forest_with_root();
        let focus = resolve_focus(&forest, &root, &NodeId::new());
        assert_eq!(
            focus,
            Focus::Overview {
                selected_root: Some(root)
            }
        );
    }

    #[test]
    fn given_stale_middle_when_resolving_then_redirects_to_first_child() {
        let (forest, root) = forest_with_root();
        let first = create_node(Some("first"));
        let first_id = *first.id();
        let forest = forest.append_child_node(&root, first).append_child(&root, None);

        let focus = resolve_focus(&forest, &root, &NodeId::new());

        assert_eq!(
            focus,
            Focus::Redirect {
                root,
                middle: first_id
            }
        );
    }

    #[test]
    fn given_valid_address_when_resolving_then_shows() {
        let (forest, root) = forest_with_root();
        let middle = create_node(Some("middle"));
        let middle_id = *middle.id();
        let forest = forest.append_child_node(&root, middle);

        assert_eq!(
            resolve_focus(&forest, &root, &middle_id),
            Focus::Show {
                root,
                middle: middle_id
            }
        );
    }

    #[test]
    fn given_selection_states_when_reconciling_then_falls_back_to_first_root() {
        let (forest, root) = forest_with_root();
        assert_eq!(reconcile_selection(&Forest::new(), Some(root)), None);
        assert_eq!(reconcile_selection(&forest, None), Some(root));
        assert_eq!(reconcile_selection(&forest, Some(NodeId::new())), Some(root));
        assert_eq!(reconcile_selection(&forest, Some(root)), Some(root));
    }
}
