//! Text rendering of a forest: task table, tree, node map and screens.

use std::collections::HashMap;

use itertools::Itertools;
use termtree::Tree;

use crate::config::Labels;
use crate::domain::{Forest, LayoutEngine, Node, NodeId, NodeLayout};

const TABLE_HEADERS: [&str; 4] = ["#", "Top level", "Middle", "Leaf"];

/// Title for display; empty titles show as the "unnamed" label.
pub fn display_title<'a>(title: &'a str, labels: &'a Labels) -> &'a str {
    if title.is_empty() {
        &labels.unnamed
    } else {
        title
    }
}

/// One row of the task table, i.e. one root-to-terminal chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// The chain's terminal node, opened by `open <row>`.
    pub task: NodeId,
    pub cells: [String; 3],
}

/// Rows of the task table in forest order.
pub fn task_rows(forest: &Forest, labels: &Labels) -> Vec<TaskRow> {
    let cell = |node: Option<&Node>| {
        node.map(|n| display_title(n.title(), labels).to_string())
            .unwrap_or_else(|| labels.empty_cell.clone())
    };
    forest
        .leaf_paths()
        .map(|path| TaskRow {
            task: *path.terminal().id(),
            cells: [
                display_title(path.root().title(), labels).to_string(),
                cell(path.middle()),
                cell(path.leaf()),
            ],
        })
        .collect()
}

/// Format rows as an aligned, `|`-separated table with a header.
///
/// The first column numbers the rows from 1.
pub fn format_table(rows: &[TaskRow]) -> String {
    let numbered: Vec<[String; 4]> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let [top, middle, leaf] = row.cells.clone();
            [(idx + 1).to_string(), top, middle, leaf]
        })
        .collect();
    let header = TABLE_HEADERS.map(String::from);

    let mut widths = header.each_ref().map(|h| h.chars().count());
    for row in &numbered {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", line(&header)));
    out.push_str(&format!(
        "{}\n",
        widths.iter().map(|w| "-".repeat(*w)).join("-+-")
    ));
    for row in &numbered {
        out.push_str(&format!("{}\n", line(row)));
    }
    out
}

/// Detail of one task: its chain from the root, id and depth.
pub fn render_task(forest: &Forest, id: &NodeId, labels: &Labels) -> String {
    let Some(path) = forest.path_to(id) else {
        return String::new();
    };
    let chain = (1..=path.len())
        .filter_map(|len| forest.find_at(&path[..len]))
        .map(|node| display_title(node.title(), labels))
        .join(" / ");

    let mut out = format!("{chain}\n");
    out.push_str(&format!("  id:       {id}\n"));
    out.push_str(&format!("  depth:    {}\n", path.len() - 1));
    if let Some(node) = forest.find(id) {
        out.push_str(&format!("  subtasks: {}\n", node.children().len()));
    }
    out
}

/// Conversion into a printable [`termtree::Tree`].
pub trait ToTermTree {
    fn to_term_tree(&self, labels: &Labels) -> Tree<String>;
}

impl ToTermTree for Node {
    fn to_term_tree(&self, labels: &Labels) -> Tree<String> {
        let label = format!("{} [{}]", display_title(self.title(), labels), self.id().short());
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|child| child.to_term_tree(labels))
            .collect();
        Tree::new(label).with_leaves(leaves)
    }
}

impl ToTermTree for Forest {
    fn to_term_tree(&self, labels: &Labels) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("(no tasks)".to_string());
        }
        let leaves: Vec<_> = self
            .roots()
            .iter()
            .map(|root| root.to_term_tree(labels))
            .collect();
        Tree::new("tasks".to_string()).with_leaves(leaves)
    }
}

/// Forest as a printable tree of titles and short ids.
pub fn render_tree(forest: &Forest, labels: &Labels) -> Tree<String> {
    forest.to_term_tree(labels)
}

/// Tree annotated with each node's layout diameter and child grid.
pub fn render_map(forest: &Forest, engine: &LayoutEngine, labels: &Labels) -> Tree<String> {
    fn annotate(node: &Node, layouts: &HashMap<NodeId, NodeLayout>, labels: &Labels) -> Tree<String> {
        let title = display_title(node.title(), labels);
        let label = match layouts.get(node.id()) {
            Some(layout) if layout.metrics.columns > 0 => format!(
                "{} ⌀{} grid {}x{} cell {}",
                title,
                layout.metrics.size,
                layout.metrics.columns,
                layout.rows,
                layout.metrics.child_max_size
            ),
            Some(layout) => format!("{} ⌀{}", title, layout.metrics.size),
            None => title.to_string(),
        };
        let leaves: Vec<_> = node
            .children()
            .iter()
            .map(|child| annotate(child, layouts, labels))
            .collect();
        Tree::new(label).with_leaves(leaves)
    }

    if forest.is_empty() {
        return Tree::new("(no tasks)".to_string());
    }
    let layouts = engine.layout_forest(forest);
    let leaves: Vec<_> = forest
        .roots()
        .iter()
        .map(|root| annotate(root, &layouts, labels))
        .collect();
    Tree::new("map".to_string()).with_leaves(leaves)
}

/// Overview screen: all roots, and the children of the selected root.
pub fn render_overview(forest: &Forest, selected: Option<&NodeId>, labels: &Labels) -> String {
    if forest.is_empty() {
        return "No tasks yet. Add a top-level task with `root`.\n".to_string();
    }

    let mut out = String::from("Top level\n");
    let mut selected_pos = None;
    for (idx, root) in forest.roots().iter().enumerate() {
        let is_selected = selected == Some(root.id());
        if is_selected {
            selected_pos = Some((idx + 1, root));
        }
        let marker = if is_selected { ">" } else { " " };
        out.push_str(&format!(
            "{} {} {}\n",
            marker,
            idx + 1,
            display_title(root.title(), labels)
        ));
    }

    if let Some((pos, root)) = selected_pos {
        out.push_str(&format!(
            "\nMiddle ({})\n",
            display_title(root.title(), labels)
        ));
        if root.is_leaf() {
            out.push_str("  (none)\n");
        }
        for (idx, child) in root.children().iter().enumerate() {
            out.push_str(&format!(
                "  {}.{} {}\n",
                pos,
                idx + 1,
                display_title(child.title(), labels)
            ));
        }
    }
    out
}

/// Middle screen: the root's children with `middle` marked, and the
/// children of `middle`.
///
/// Both ids must resolve as root and child of that root.
pub fn render_focus(forest: &Forest, root_id: &NodeId, middle_id: &NodeId, labels: &Labels) -> String {
    let (Some(root), Some(middle)) = (
        forest.find_at(&[*root_id]),
        forest.find_at(&[*root_id, *middle_id]),
    ) else {
        return String::new();
    };
    let root_pos = forest
        .roots()
        .iter()
        .position(|r| r.id() == root_id)
        .map_or(0, |idx| idx + 1);

    let mut out = format!(
        "{} / {}\n",
        display_title(root.title(), labels),
        display_title(middle.title(), labels)
    );
    out.push_str("\nMiddle\n");
    let mut middle_pos = 0;
    for (idx, child) in root.children().iter().enumerate() {
        let is_focused = child.id() == middle_id;
        if is_focused {
            middle_pos = idx + 1;
        }
        let marker = if is_focused { ">" } else { " " };
        out.push_str(&format!(
            "{} {}.{} {}\n",
            marker,
            root_pos,
            idx + 1,
            display_title(child.title(), labels)
        ));
    }

    out.push_str("\nLeaf\n");
    if middle.is_leaf() {
        out.push_str("  (none)\n");
    }
    for (idx, leaf) in middle.children().iter().enumerate() {
        out.push_str(&format!(
            "  {}.{}.{} {}\n",
            root_pos,
            middle_pos,
            idx + 1,
            display_title(leaf.title(), labels)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::create_node;

    fn sample() -> Forest {
        let a = create_node(Some("A"));
        let b = create_node(Some(""));
        let m = create_node(Some("M"));
        let (a_id, m_id) = (*a.id(), *m.id());
        Forest::new()
            .append_root(a)
            .append_root(b)
            .append_child_node(&a_id, m)
            .append_child(&m_id, Some("L1"))
            .append_child(&m_id, Some(""))
            .append_child(&a_id, Some("M2"))
    }

    #[test]
    fn given_empty_title_when_displaying_then_unnamed_label() {
        let labels = Labels::default();
        assert_eq!(display_title("", &labels), "Unnamed");
        assert_eq!(display_title("x", &labels), "x");
    }

    #[test]
    fn given_mixed_depths_when_building_rows_then_one_row_per_chain() {
        let labels = Labels::default();
        let rows = task_rows(&sample(), &labels);

        let cells: Vec<[&str; 3]> = rows
            .iter()
            .map(|row| row.cells.each_ref().map(String::as_str))
            .collect();
        assert_eq!(
            cells,
            vec![
                ["A", "M", "L1"],
                ["A", "M", "Unnamed"],
                ["A", "M2", "—"],
                ["Unnamed", "—", "—"],
            ]
        );
    }

    #[test]
    fn given_rows_when_formatting_then_columns_align() {
        let labels = Labels::default();
        let table = format_table(&task_rows(&sample(), &labels));
        let lines: Vec<&str> = table.lines().collect();

        let bars = |line: &str| -> Vec<usize> {
            line.chars()
                .enumerate()
                .filter(|(_, c)| *c == '|')
                .map(|(idx, _)| idx)
                .collect()
        };

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("# | Top level | Middle | Leaf"));
        assert!(lines[2].starts_with("1 | A "));
        assert!(lines[5].starts_with("4 | Unnamed "));
        assert!(lines[2..].iter().all(|line| bars(line) == bars(lines[0])));
    }

    #[test]
    fn given_chain_deeper_than_three_when_building_rows_then_leaf_cell_is_terminal() {
        let labels = Labels::default();
        let (a, b, c) = (create_node(Some("A")), create_node(Some("B")), create_node(Some("C")));
        let (a_id, b_id, c_id) = (*a.id(), *b.id(), *c.id());
        let forest = Forest::new()
            .append_root(a)
            .append_child_node(&a_id, b)
            .append_child_node(&b_id, c)
            .append_child(&c_id, Some("D"));

        let rows = task_rows(&forest, &labels);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, ["A", "B", "D"].map(String::from));
        assert_eq!(forest.find(&rows[0].task).map(|n| n.title()), Some("D"));
    }

    #[test]
    fn given_row_task_when_rendering_detail_then_shows_chain_and_depth() {
        let labels = Labels::default();
        let forest = sample();
        let rows = task_rows(&forest, &labels);

        let detail = render_task(&forest, &rows[1].task, &labels);

        assert!(detail.starts_with("A / M / Unnamed\n"));
        assert!(detail.contains(&format!("id:       {}", rows[1].task)));
        assert!(detail.contains("depth:    2"));
        assert!(render_task(&forest, &NodeId::new(), &labels).is_empty());
    }

    #[test]
    fn given_forest_when_rendering_tree_then_lists_all_titles() {
        let labels = Labels::default();
        let rendered = render_tree(&sample(), &labels).to_string();
        for title in ["tasks", "A", "M", "L1", "M2", "Unnamed"] {
            assert!(rendered.contains(title), "missing {title} in\n{rendered}");
        }
    }

    #[test]
    fn given_forest_when_rendering_map_then_parents_show_grid() {
        let labels = Labels::default();
        let rendered = render_map(&sample(), &LayoutEngine::default(), &labels).to_string();
        assert!(rendered.contains("M ⌀"));
        assert!(rendered.contains("grid 2x1"));
        assert!(rendered.contains("L1 ⌀150"));
    }

    #[test]
    fn given_selected_root_when_rendering_overview_then_lists_its_children() {
        let labels = Labels::default();
        let forest = sample();
        let a = *forest.roots()[0].id();

        let overview = render_overview(&forest, Some(&a), &labels);

        assert!(overview.contains("> 1 A"));
        assert!(overview.contains("  1.1 M"));
        assert!(overview.contains("  1.2 M2"));
    }

    #[test]
    fn given_focus_when_rendering_then_marks_middle_and_lists_leaves() {
        let labels = Labels::default();
        let forest = sample();
        let a = &forest.roots()[0];
        let m = *a.children()[0].id();

        let screen = render_focus(&forest, a.id(), &m, &labels);

        assert!(screen.starts_with("A / M"));
        assert!(screen.contains("> 1.1 M"));
        assert!(screen.contains("  1.1.1 L1"));
        assert!(screen.contains("  1.1.2 Unnamed"));
    }
}
