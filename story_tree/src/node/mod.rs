//! Node definitions for the story tree.

mod beat;
mod story_node;

pub use beat::*;
pub use story_node::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of hex characters of a fresh UUID used to salt child ids.
const SALT_LEN: usize = 12;

/// Opaque, globally unique identifier of a story node.
///
/// Ids are never reused: roots get a fresh UUID suffix and children are
/// derived from their parent id, their sibling index and a random salt, so
/// two racing expansions of the same parent never mint colliding ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Mint a fresh id for a story root.
    pub fn root() -> Self {
        Self(format!("root-{}", Uuid::new_v4().simple()))
    }

    /// Mint a fresh id for the child at `index` of `parent`.
    pub fn child(parent: &NodeId, index: usize) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}-{}", parent.0, index, &salt[..SALT_LEN]))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_ids_are_unique() {
        let a = NodeId::root();
        let b = NodeId::root();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("root-"));
    }

    #[test]
    fn test_child_id_derives_from_parent_and_index() {
        let parent = NodeId::from("root-abc");
        let child = NodeId::child(&parent, 2);
        assert!(child.as_str().starts_with("root-abc-2-"));
        assert_eq!(child.as_str().len(), "root-abc-2-".len() + SALT_LEN);
    }

    #[test]
    fn test_child_ids_never_collide_for_same_slot() {
        let parent = NodeId::from("root");
        let first = NodeId::child(&parent, 0);
        let second = NodeId::child(&parent, 0);
        assert_ne!(first, second);
    }
}
