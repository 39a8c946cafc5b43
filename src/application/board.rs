//! Task board: the single editable forest of a session.
//!
//! The board owns the current [`Forest`] and replaces it with the result of
//! every mutation. It also tracks which root is selected in the overview and
//! resolves the node references typed by a user.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::navigation::{reconcile_selection, resolve_focus, Focus};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{create_node, Forest, LayoutEngine, NodeId, NodeRef};

/// Length of a hyphenated UUID.
const FULL_ID_LEN: usize = 36;

fn position_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9]\d*(\.[1-9]\d*)*$").expect("valid position regex"))
}

/// Editable session state around a [`Forest`].
#[derive(Debug, Clone)]
pub struct TaskBoard {
    forest: Forest,
    selected_root: Option<NodeId>,
    settings: Settings,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl TaskBoard {
    pub fn new(settings: Settings) -> Self {
        Self {
            forest: Forest::new(),
            selected_root: None,
            settings,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Layout engine configured from the board's settings.
    pub fn layout_engine(&self) -> LayoutEngine {
        LayoutEngine::new(self.settings.layout_config())
    }

    /// Currently selected root, if any.
    pub fn selected_root(&self) -> Option<&NodeRef> {
        self.selected_root
            .as_ref()
            .and_then(|id| self.forest.find_at(&[*id]))
    }

    /// Select a root; ids of nested nodes are ignored.
    pub fn select_root(&mut self, id: &NodeId) -> bool {
        if self.forest.find_at(&[*id]).is_none() {
            return false;
        }
        self.selected_root = Some(*id);
        true
    }

    /// Append a new root and select it.
    #[instrument(level = "debug", skip(self))]
    pub fn add_root(&mut self, title: Option<&str>) -> NodeId {
        let node = create_node(Some(title.unwrap_or(self.settings.default_title(0))));
        let id = *node.id();
        self.replace(self.forest.append_root(node));
        self.selected_root = Some(id);
        id
    }

    /// Append a child to `parent_id`; `None` if the parent is unknown.
    ///
    /// The default title depends on the depth the new node lands at. The
    /// root containing the parent becomes the selected root.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent_id: &NodeId, title: Option<&str>) -> Option<NodeId> {
        let path = self.forest.path_to(parent_id)?;
        let node = create_node(Some(
            title.unwrap_or(self.settings.default_title(path.len())),
        ));
        let id = *node.id();
        self.replace(self.forest.append_child_node(parent_id, node));
        self.selected_root = path.first().copied();
        Some(id)
    }

    /// Insert a node right after `anchor_id` among its siblings; `None` if
    /// the anchor is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn add_sibling_after(&mut self, anchor_id: &NodeId, title: Option<&str>) -> Option<NodeId> {
        let parent = self.forest.parent_of(anchor_id)?;
        let depth = self.forest.depth_of(anchor_id)?;
        let node = create_node(Some(title.unwrap_or(self.settings.default_title(depth))));
        let id = *node.id();
        self.replace(
            self.forest
                .insert_sibling_node_after(parent.as_ref(), anchor_id, node),
        );
        Some(id)
    }

    /// Rename `id`; `false` if it is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, id: &NodeId, title: &str) -> bool {
        if self.forest.find(id).is_none() {
            return false;
        }
        self.replace(self.forest.rename_node(id, title));
        true
    }

    /// Focus for the root/middle screen, with fallback for stale ids.
    pub fn focus(&self, root_id: &NodeId, middle_id: &NodeId) -> Focus {
        resolve_focus(&self.forest, root_id, middle_id)
    }

    /// Resolve a user reference to a node id.
    ///
    /// Accepted forms: a 1-based position path such as `2.1.3`, a full id,
    /// or a unique prefix of an id (hyphens optional). A digits-only
    /// reference that is not a valid position is tried as an id prefix.
    pub fn resolve(&self, reference: &str) -> ApplicationResult<NodeId> {
        let reference = reference.trim();
        if position_pattern().is_match(reference) {
            if let Some(id) = self.resolve_position(reference) {
                return Ok(id);
            }
            if reference.contains('.') {
                return Err(ApplicationError::UnknownNode(reference.to_string()));
            }
        }
        if reference.len() == FULL_ID_LEN {
            let id: NodeId = reference.parse()?;
            return self
                .forest
                .find(&id)
                .map(|node| *node.id())
                .ok_or_else(|| ApplicationError::UnknownNode(reference.to_string()));
        }

        let needle = reference.replace('-', "").to_lowercase();
        if needle.is_empty() {
            return Err(ApplicationError::UnknownNode(reference.to_string()));
        }
        let mut matches = self
            .forest
            .iter()
            .map(|(_, node)| *node.id())
            .filter(|id| id.as_uuid().simple().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(ApplicationError::AmbiguousNode(reference.to_string())),
            (None, _) => Err(ApplicationError::UnknownNode(reference.to_string())),
        }
    }

    fn resolve_position(&self, reference: &str) -> Option<NodeId> {
        let mut siblings = self.forest.roots();
        let mut found: Option<&NodeRef> = None;
        for segment in reference.split('.') {
            let index: usize = segment.parse().ok()?;
            let node = index.checked_sub(1).and_then(|idx| siblings.get(idx))?;
            siblings = node.children();
            found = Some(node);
        }
        found.map(|node| *node.id())
    }

    /// 1-based position path of `id`, e.g. `2.1.3`.
    pub fn position_of(&self, id: &NodeId) -> Option<String> {
        let path = self.forest.path_to(id)?;
        let mut siblings = self.forest.roots();
        let mut segments = Vec::with_capacity(path.len());
        for step in &path {
            let idx = siblings.iter().position(|node| node.id() == step)?;
            segments.push((idx + 1).to_string());
            siblings = siblings[idx].children();
        }
        Some(segments.join("."))
    }

    fn replace(&mut self, forest: Forest) {
        self.forest = forest;
        self.selected_root = reconcile_selection(&self.forest, self.selected_root);
        debug!(
            "board: {} roots, {} nodes",
            self.forest.len(),
            self.forest.node_count()
        );
    }
}
