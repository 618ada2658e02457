//! The story node, sole entity of the tree.

use serde::{Serialize, Serializer};
use std::sync::Arc;

use super::{Beat, NodeId};

/// A sentence in the story tree.
///
/// Nodes are immutable values: every change produces a new node, and
/// untouched children are shared between the old and the new value through
/// `Arc`. Fields are read through accessors so the triad invariants hold:
///
/// - a node has either no children or exactly three, tagged INICIO, NUDO and
///   DESENLACE in that order;
/// - `is_expanded` is only ever true while the three children exist;
/// - the root is the only node without a parent and without a beat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    id: NodeId,
    text: String,
    children: Vec<Arc<StoryNode>>,
    is_expanded: bool,
    parent_id: Option<NodeId>,
    #[serde(rename = "beatIndex", serialize_with = "serialize_beat_index")]
    beat: Option<Beat>,
}

/// Beats go out as their sibling position, `null` for the root.
fn serialize_beat_index<S>(beat: &Option<Beat>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    beat.map(|b| b.index()).serialize(serializer)
}

impl StoryNode {
    /// Create a fresh story root holding the premise.
    ///
    /// Premise validation (trimming, rejecting blank input) happens before
    /// this point.
    pub fn root(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::root(),
            text: text.into(),
            children: Vec::new(),
            is_expanded: false,
            parent_id: None,
            beat: None,
        }
    }

    fn child(parent: &NodeId, beat: Beat, text: String) -> Self {
        Self {
            id: NodeId::child(parent, beat.index()),
            text,
            children: Vec::new(),
            is_expanded: false,
            parent_id: Some(parent.clone()),
            beat: Some(beat),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Arc<StoryNode>] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn beat(&self) -> Option<Beat> {
        self.beat
    }

    /// Check if this node has materialized children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this node is the story root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Copy of this node holding three freshly minted children, expanded.
    ///
    /// Any previous children are replaced; new ids are always minted.
    pub fn expanded_with(&self, sentences: [String; 3]) -> Self {
        let children = Beat::ALL
            .into_iter()
            .zip(sentences)
            .map(|(beat, text)| Arc::new(Self::child(&self.id, beat, text)))
            .collect();

        Self {
            id: self.id.clone(),
            text: self.text.clone(),
            children,
            is_expanded: true,
            parent_id: self.parent_id.clone(),
            beat: self.beat,
        }
    }

    /// Copy of this node with new text, its stale descendants discarded.
    pub fn regenerated(&self, text: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            text: text.into(),
            children: Vec::new(),
            is_expanded: false,
            parent_id: self.parent_id.clone(),
            beat: self.beat,
        }
    }

    /// Copy of this node with its display flag flipped.
    ///
    /// A childless node cannot be shown expanded and is returned unchanged.
    pub fn toggled(&self) -> Self {
        let mut node = self.clone();
        if node.has_children() {
            node.is_expanded = !node.is_expanded;
        }
        node
    }

    /// Copy of this node with its child list swapped, used when rebuilding
    /// the path above a replaced node.
    pub(crate) fn with_children(&self, children: Vec<Arc<StoryNode>>) -> Self {
        Self {
            id: self.id.clone(),
            text: self.text.clone(),
            children,
            is_expanded: self.is_expanded,
            parent_id: self.parent_id.clone(),
            beat: self.beat,
        }
    }
}
