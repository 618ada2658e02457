//! Identity-addressed lookup and replacement over an immutable story tree.
//!
//! The tree is never edited in place. `replace` rebuilds only the path from
//! the root down to the target and reuses every other subtree through its
//! `Arc`, so older snapshots stay valid and untouched branches are shared.
//!
//! Traversal of record is always root-down through `children`, depth-first,
//! parent before children, siblings in order. `parent_id` is never followed.

use std::sync::Arc;

use crate::node::{NodeId, StoryNode};

/// Sibling indices leading from the root to a node.
type Path = Vec<usize>;

/// Find the path to the first node (in pre-order) whose id matches.
fn locate_path(tree: &StoryNode, id: &NodeId) -> Option<Path> {
    let mut stack: Vec<(&StoryNode, Path)> = vec![(tree, Vec::new())];

    while let Some((node, path)) = stack.pop() {
        if node.id() == id {
            return Some(path);
        }

        // Reverse push keeps the first sibling on top of the stack
        for (index, child) in node.children().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(index);
            stack.push((child.as_ref(), child_path));
        }
    }

    None
}

/// Find the node with the given id.
pub fn locate<'a>(tree: &'a StoryNode, id: &NodeId) -> Option<&'a StoryNode> {
    let path = locate_path(tree, id)?;
    let mut current = tree;
    for index in path {
        current = current.children()[index].as_ref();
    }
    Some(current)
}

/// Find the parent of the node with the given id.
///
/// Resolved by lookup of the child's `parent_id`, which is the ownership
/// back-reference; returns `None` for the root or an unknown id.
pub fn locate_parent<'a>(tree: &'a StoryNode, id: &NodeId) -> Option<&'a StoryNode> {
    let parent_id = locate(tree, id)?.parent_id()?;
    locate(tree, parent_id)
}

/// Check if a node with the given id is part of the tree.
pub fn contains(tree: &StoryNode, id: &NodeId) -> bool {
    locate_path(tree, id).is_some()
}

/// Return a tree where the node matching `id` is replaced by
/// `transform(node)`.
///
/// Ancestors along the path are rebuilt; all other subtrees are shared with
/// the input. If no node matches, the input tree itself is returned, which
/// lets results addressed to a discarded tree drop harmlessly.
pub fn replace<F>(tree: &Arc<StoryNode>, id: &NodeId, transform: F) -> Arc<StoryNode>
where
    F: FnOnce(&StoryNode) -> StoryNode,
{
    let Some(path) = locate_path(tree, id) else {
        return Arc::clone(tree);
    };

    let mut ancestors: Vec<&Arc<StoryNode>> = Vec::with_capacity(path.len());
    let mut current = tree;
    for &index in &path {
        ancestors.push(current);
        current = &current.children()[index];
    }

    let mut rebuilt = Arc::new(transform(current.as_ref()));
    for (ancestor, &index) in ancestors.into_iter().rev().zip(path.iter().rev()) {
        let mut children = ancestor.children().to_vec();
        children[index] = rebuilt;
        rebuilt = Arc::new(ancestor.with_children(children));
    }

    rebuilt
}

/// Count all materialized nodes, collapsed subtrees included.
pub fn node_count(tree: &StoryNode) -> usize {
    let mut count = 0;
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children().iter().map(|child| child.as_ref()));
    }
    count
}
