//! Flattened text export of the visible story tree.
//!
//! Output is one line per node, pre-order, indented two spaces per depth
//! level and tagged with the node's beat (`[PREMISE]` for the root). Only
//! children of expanded nodes are written, so the export mirrors what the
//! reader currently has open rather than everything that was generated.

use crate::node::StoryNode;

/// Tag written before the root sentence.
pub const PREMISE_LABEL: &str = "PREMISE";

const INDENT: &str = "  ";

/// Serialize the visible part of the tree.
pub fn serialize(tree: &StoryNode) -> String {
    let mut output = String::new();
    let mut stack: Vec<(&StoryNode, usize)> = vec![(tree, 0)];

    while let Some((node, depth)) = stack.pop() {
        let label = node.beat().map(|b| b.label()).unwrap_or(PREMISE_LABEL);
        output.push_str(&format!(
            "{}[{}] {}\n",
            INDENT.repeat(depth),
            label,
            node.text()
        ));

        if node.is_expanded() {
            for child in node.children().iter().rev() {
                stack.push((child.as_ref(), depth + 1));
            }
        }
    }

    output
}

/// Serialize the tree under a titled header rule.
pub fn render_document(tree: &StoryNode, title: &str, rule_width: usize) -> String {
    format!("{}\n{}\n\n{}", title, "=".repeat(rule_width), serialize(tree))
}
