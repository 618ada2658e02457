//! Lifecycle tracking for in-flight node operations.
//!
//! Membership is advisory: the rendering layer uses it to show progress and
//! to disable controls, and the coordinator consults it to refuse a second
//! operation on a busy node. It is not a lock.

use serde::Serialize;
use std::collections::HashSet;
use story_tree::NodeId;

/// Kind of asynchronous node operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    Expanding,
    Regenerating,
}

/// The two sets of node ids with an operation in flight.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LifecycleTracker {
    expanding: HashSet<NodeId>,
    regenerating: HashSet<NodeId>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: OperationKind) -> &HashSet<NodeId> {
        match kind {
            OperationKind::Expanding => &self.expanding,
            OperationKind::Regenerating => &self.regenerating,
        }
    }

    fn set_mut(&mut self, kind: OperationKind) -> &mut HashSet<NodeId> {
        match kind {
            OperationKind::Expanding => &mut self.expanding,
            OperationKind::Regenerating => &mut self.regenerating,
        }
    }

    /// Add an id to a set. Returns false if it was already marked.
    pub fn mark(&mut self, kind: OperationKind, id: NodeId) -> bool {
        self.set_mut(kind).insert(id)
    }

    /// Remove an id from a set. Returns false if it was not marked.
    pub fn unmark(&mut self, kind: OperationKind, id: &NodeId) -> bool {
        self.set_mut(kind).remove(id)
    }

    pub fn is_marked(&self, kind: OperationKind, id: &NodeId) -> bool {
        self.set(kind).contains(id)
    }

    /// Check if an id has any operation in flight.
    pub fn is_busy(&self, id: &NodeId) -> bool {
        self.expanding.contains(id) || self.regenerating.contains(id)
    }

    /// All ids currently marked for one kind of operation.
    pub fn marked(&self, kind: OperationKind) -> &HashSet<NodeId> {
        self.set(kind)
    }

    /// Forget every in-flight operation.
    pub fn clear(&mut self) {
        self.expanding.clear();
        self.regenerating.clear();
    }
}
