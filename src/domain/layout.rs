//! Layout sizing for the packed node map.
//!
//! Every node is drawn as a circle that contains a header and a square-ish
//! grid of its children's circles. Sizes are computed bottom-up: a node's
//! diameter is the diagonal of its padded content rectangle, never smaller
//! than the base size of its depth.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::forest::Forest;
use crate::domain::id::NodeId;
use crate::domain::node::Node;

/// Constants of the sizing algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Minimum diameter per depth, non-increasing; deeper levels reuse the last entry.
    pub base_sizes: Vec<u32>,
    /// Space between neighbouring child cells.
    pub gap: u32,
    /// Vertical room reserved for the node's own title.
    pub header: u32,
    /// Margin added on every side of the content rectangle.
    pub padding: u32,
    /// Minimum content width as a fraction of the node's base size.
    pub min_width_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_sizes: vec![320, 220, 150, 100, 72],
            gap: 16,
            header: 40,
            padding: 20,
            min_width_ratio: 0.6,
        }
    }
}

impl LayoutConfig {
    /// Base diameter at `depth`, clamped to the last table entry.
    pub fn base_size(&self, depth: usize) -> u32 {
        self.base_sizes
            .get(depth)
            .or_else(|| self.base_sizes.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Result of sizing one subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Diameter the subtree needs.
    pub size: u32,
    /// Cell size of the children grid (floored by the next depth's base size).
    pub child_max_size: u32,
    /// Grid columns for the children; 0 for a node without children.
    pub columns: usize,
}

impl LayoutMetrics {
    /// Grid rows needed for `child_count` children.
    pub fn rows(&self, child_count: usize) -> usize {
        if self.columns == 0 {
            0
        } else {
            child_count.div_ceil(self.columns)
        }
    }
}

/// Metrics of one node as placed in a forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLayout {
    pub depth: usize,
    pub rows: usize,
    pub metrics: LayoutMetrics,
}

/// Computes [`LayoutMetrics`] with a given [`LayoutConfig`].
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Size the subtree rooted at `node`, placed at `depth`.
    pub fn compute(&self, node: &Node, depth: usize) -> LayoutMetrics {
        self.measure(node, depth, &mut |_: &Node, _: usize, _: LayoutMetrics| {})
    }

    /// Size every node of `forest` in a single bottom-up pass.
    ///
    /// Yields the same metrics as calling [`LayoutEngine::compute`] on each
    /// node at its depth.
    #[instrument(level = "debug", skip_all, fields(nodes = forest.node_count()))]
    pub fn layout_forest(&self, forest: &Forest) -> HashMap<NodeId, NodeLayout> {
        let mut layouts = HashMap::with_capacity(forest.node_count());
        for root in forest.roots() {
            self.measure(root, 0, &mut |node: &Node, depth: usize, metrics: LayoutMetrics| {
                layouts.insert(
                    *node.id(),
                    NodeLayout {
                        depth,
                        rows: metrics.rows(node.children().len()),
                        metrics,
                    },
                );
            });
        }
        debug!("layout_forest: sized {} nodes", layouts.len());
        layouts
    }

    fn measure<F>(&self, node: &Node, depth: usize, visit: &mut F) -> LayoutMetrics
    where
        F: FnMut(&Node, usize, LayoutMetrics),
    {
        let base = self.config.base_size(depth);
        let next_base = self.config.base_size(depth + 1);

        let metrics = if node.is_leaf() {
            LayoutMetrics {
                size: base,
                child_max_size: next_base,
                columns: 0,
            }
        } else {
            let count = node.children().len();
            let largest_child = node
                .children()
                .iter()
                .map(|child| self.measure(child, depth + 1, visit).size)
                .max()
                .unwrap_or(0);
            let cell = largest_child.max(next_base);
            let columns = grid_columns(count);
            let rows = count.div_ceil(columns);

            let gap = f64::from(self.config.gap);
            let cell_f = f64::from(cell);
            let grid_w = columns as f64 * cell_f + (columns - 1) as f64 * gap;
            let grid_h = rows as f64 * cell_f + (rows - 1) as f64 * gap;

            let content_h = grid_h + f64::from(self.config.header);
            let content_w = grid_w.max(self.config.min_width_ratio * f64::from(base));

            let pad = 2.0 * f64::from(self.config.padding);
            let (w, h) = (content_w + pad, content_h + pad);
            let diagonal = (w * w + h * h).sqrt().ceil() as u32;

            LayoutMetrics {
                size: diagonal.max(base),
                child_max_size: cell,
                columns,
            }
        };

        visit(node, depth, metrics);
        metrics
    }
}

/// Size a subtree with the default constants.
pub fn compute_layout(node: &Node, depth: usize) -> LayoutMetrics {
    LayoutEngine::default().compute(node, depth)
}

/// Smallest `c >= 1` with `c * c >= count`, i.e. `ceil(sqrt(count))`.
fn grid_columns(count: usize) -> usize {
    let mut columns = ((count as f64).sqrt() as usize).max(1);
    while columns * columns < count {
        columns += 1;
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::create_node;
    use rstest::rstest;

    fn with_leaf_children(count: usize) -> Forest {
        let parent = create_node(Some("parent"));
        let id = *parent.id();
        (0..count).fold(Forest::new().append_root(parent), |forest, i| {
            forest.append_child(&id, Some(&format!("child {i}")))
        })
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(4, 2)]
    #[case(5, 3)]
    #[case(9, 3)]
    #[case(10, 4)]
    fn given_child_count_when_grid_columns_then_ceil_sqrt(
        #[case] count: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(grid_columns(count), expected);
    }

    #[test]
    fn given_depth_beyond_table_when_base_size_then_clamps_to_last() {
        let config = LayoutConfig::default();
        assert_eq!(config.base_size(0), 320);
        assert_eq!(config.base_size(4), 72);
        assert_eq!(config.base_size(40), 72);
    }

    #[test]
    fn given_empty_table_when_base_size_then_zero() {
        let config = LayoutConfig {
            base_sizes: vec![],
            ..LayoutConfig::default()
        };
        assert_eq!(config.base_size(0), 0);
    }

    #[test]
    fn given_leaf_when_computing_then_base_size_and_next_depth_cell() {
        let leaf = create_node(None);
        let metrics = compute_layout(&leaf, 1);
        assert_eq!(
            metrics,
            LayoutMetrics {
                size: 220,
                child_max_size: 150,
                columns: 0
            }
        );
        assert_eq!(metrics.rows(0), 0);
    }

    #[test]
    fn given_five_leaf_children_at_depth_one_when_computing_then_three_by_two_grid() {
        let forest = with_leaf_children(5);
        let node = &forest.roots()[0];

        let metrics = compute_layout(node, 1);

        assert_eq!(metrics.columns, 3);
        assert_eq!(metrics.rows(5), 2);
        assert_eq!(metrics.child_max_size, 150);
        // 522 x 396 padded rectangle
        assert_eq!(metrics.size, 656);
    }

    #[test]
    fn given_narrow_grid_when_computing_then_min_width_ratio_applies() {
        let engine = LayoutEngine::new(LayoutConfig {
            base_sizes: vec![200, 50],
            gap: 0,
            header: 0,
            padding: 100,
            min_width_ratio: 0.6,
        });
        let forest = with_leaf_children(1);

        let metrics = engine.compute(&forest.roots()[0], 0);

        // content width 120 instead of the 50-wide grid
        assert_eq!(metrics.size, 407);
    }

    #[test]
    fn given_forest_when_layout_forest_then_matches_per_node_compute() {
        let forest = with_leaf_children(7);
        let root_id = *forest.roots()[0].id();
        let forest = forest.append_child(&root_id, None);
        let nested_parent = *forest.roots()[0].children()[2].id();
        let forest = forest
            .append_child(&nested_parent, None)
            .append_child(&nested_parent, None);
        let engine = LayoutEngine::default();

        let layouts = engine.layout_forest(&forest);

        assert_eq!(layouts.len(), forest.node_count());
        for (depth, node) in forest.iter() {
            let layout = layouts[node.id()];
            assert_eq!(layout.depth, depth);
            assert_eq!(layout.metrics, engine.compute(node, depth));
        }
        assert_eq!(layouts[&root_id].rows, 3);
    }
}
