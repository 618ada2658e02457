//! Per-operation lifecycle guard.

use story_tree::NodeId;
use tracing::{debug, warn};

use crate::engine::{EngineState, SharedState};
use crate::lifecycle::OperationKind;

/// Phase of a single node operation. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl OperationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationPhase::Succeeded | OperationPhase::Failed)
    }
}

/// Tracks one expansion or regeneration and its lifecycle mark.
///
/// The mark is set on `begin` and cleared on `finish`. If the operation is
/// dropped while still pending (its future was cancelled), the mark is
/// cleared on drop.
#[derive(Debug)]
pub struct Operation<'a> {
    state: &'a SharedState,
    kind: OperationKind,
    node_id: NodeId,
    phase: OperationPhase,
}

impl<'a> Operation<'a> {
    pub fn new(state: &'a SharedState, kind: OperationKind, node_id: NodeId) -> Self {
        Self {
            state,
            kind,
            node_id,
            phase: OperationPhase::Idle,
        }
    }

    pub fn phase(&self) -> OperationPhase {
        self.phase
    }

    /// Move to `Pending`, marking the node. `locked` must be the guarded
    /// value of the state this operation was created with.
    pub fn begin(&mut self, locked: &mut EngineState) {
        debug_assert_eq!(self.phase, OperationPhase::Idle);
        locked.lifecycle.mark(self.kind, self.node_id.clone());
        self.phase = OperationPhase::Pending;
        debug!(node = %self.node_id, kind = ?self.kind, "operation pending");
    }

    /// Move to a terminal phase, clearing the mark.
    pub fn finish(mut self, locked: &mut EngineState, succeeded: bool) -> OperationPhase {
        debug_assert_eq!(self.phase, OperationPhase::Pending);
        locked.lifecycle.unmark(self.kind, &self.node_id);
        self.phase = if succeeded {
            OperationPhase::Succeeded
        } else {
            OperationPhase::Failed
        };
        self.phase
    }
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        if self.phase == OperationPhase::Pending {
            warn!(node = %self.node_id, kind = ?self.kind, "operation abandoned before completion");
            self.state.lock().lifecycle.unmark(self.kind, &self.node_id);
        }
    }
}
