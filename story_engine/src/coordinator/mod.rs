//! Expansion Coordinator - runs one node operation from request to result.
//!
//! Each operation follows the same shape:
//! 1. **Check**: under the state lock, resolve the node and its preconditions
//! 2. **Mark**: record the id in the matching lifecycle set
//! 3. **Generate**: release the lock and await the generator
//! 4. **Apply**: re-lock, replace the node by id (a no-op if it is gone)
//! 5. **Unmark**: clear the lifecycle mark, whatever the outcome
//!
//! No operation is retried. A failure leaves the tree exactly as it was and
//! is reduced to one user-facing message stored as the last error.

mod operation;

pub use operation::*;

use serde::Serialize;
use story_tree::{locate, locate_parent, replace, NodeId, StoryNode};
use tracing::{debug, info, warn};

use crate::engine::{EngineState, SharedState};
use crate::error::EngineError;
use crate::generation::{CompletionBackend, StoryGenerator};
use crate::lifecycle::OperationKind;

/// Result of an intent that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Generated content was applied to the tree.
    Applied,
    /// An existing subtree was shown or hidden.
    Toggled,
    /// Text was placed on the clipboard.
    Copied,
    /// Nothing happened.
    Skipped(SkipReason),
}

/// Why an intent left everything untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// No story has been started.
    NoStory,
    /// The id is not part of the current tree.
    NotFound,
    /// The node already has an expansion or regeneration in flight.
    Busy,
    /// The result arrived after its target left the tree or gained children.
    Stale,
}

/// Drives expansions, regenerations and toggles against shared state.
#[derive(Debug)]
pub struct ExpansionCoordinator<B> {
    generator: StoryGenerator<B>,
}

impl<B: CompletionBackend> ExpansionCoordinator<B> {
    pub fn new(generator: StoryGenerator<B>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &StoryGenerator<B> {
        &self.generator
    }

    /// Generate three children for a childless node. A node that already
    /// has children is toggled instead, without any generation call.
    pub async fn expand(&self, state: &SharedState, id: &NodeId) -> Result<Outcome, EngineError> {
        let mut operation = Operation::new(state, OperationKind::Expanding, id.clone());

        let (sentence, genre) = {
            let mut locked = state.lock();
            let Some(tree) = locked.tree.clone() else {
                return Ok(Outcome::Skipped(SkipReason::NoStory));
            };
            let Some(node) = locate(&tree, id) else {
                return Ok(Outcome::Skipped(SkipReason::NotFound));
            };
            if node.has_children() {
                locked.tree = Some(replace(&tree, id, StoryNode::toggled));
                return Ok(Outcome::Toggled);
            }
            if locked.lifecycle.is_busy(id) {
                debug!(node = %id, "expansion refused, node busy");
                return Ok(Outcome::Skipped(SkipReason::Busy));
            }

            operation.begin(&mut locked);
            locked.last_error = None;
            (node.text().to_string(), locked.genre)
        };

        info!(node = %id, genre = %genre, "expanding node");
        let result = self.generator.expand(&sentence, genre).await;

        let mut locked = state.lock();
        match result {
            Ok(sentences) => {
                let outcome = apply_expansion(&mut locked, id, sentences);
                operation.finish(&mut locked, true);
                Ok(outcome)
            }
            Err(error) => {
                record_failure(&mut locked, id, &error, "expansion");
                operation.finish(&mut locked, false);
                Err(error)
            }
        }
    }

    /// Replace a non-root node's text with a new sentence for its beat.
    pub async fn regenerate(
        &self,
        state: &SharedState,
        id: &NodeId,
    ) -> Result<Outcome, EngineError> {
        let mut operation = Operation::new(state, OperationKind::Regenerating, id.clone());

        let (parent_text, beat, genre) = {
            let mut locked = state.lock();
            let Some(tree) = locked.tree.clone() else {
                return Ok(Outcome::Skipped(SkipReason::NoStory));
            };
            let Some(node) = locate(&tree, id) else {
                return Ok(Outcome::Skipped(SkipReason::NotFound));
            };
            let (Some(beat), Some(parent)) = (node.beat(), locate_parent(&tree, id)) else {
                let error = EngineError::validation(
                    "The premise cannot be regenerated; start a new story instead",
                );
                locked.last_error = Some(error.to_string());
                return Err(error);
            };
            if locked.lifecycle.is_busy(id) {
                debug!(node = %id, "regeneration refused, node busy");
                return Ok(Outcome::Skipped(SkipReason::Busy));
            }

            operation.begin(&mut locked);
            locked.last_error = None;
            (parent.text().to_string(), beat, locked.genre)
        };

        info!(node = %id, beat = %beat, genre = %genre, "regenerating node");
        let result = self.generator.regenerate(&parent_text, beat, genre).await;

        let mut locked = state.lock();
        match result {
            Ok(text) => {
                let outcome = apply_regeneration(&mut locked, id, text);
                operation.finish(&mut locked, true);
                Ok(outcome)
            }
            Err(error) => {
                record_failure(&mut locked, id, &error, "regeneration");
                operation.finish(&mut locked, false);
                Err(error)
            }
        }
    }
}

/// Install three fresh children, unless the target left the tree or was
/// expanded by someone else in the meantime.
fn apply_expansion(locked: &mut EngineState, id: &NodeId, sentences: [String; 3]) -> Outcome {
    let Some(tree) = locked.tree.clone() else {
        return stale(id);
    };
    match locate(&tree, id) {
        Some(node) if !node.has_children() => {
            locked.tree = Some(replace(&tree, id, |node| node.expanded_with(sentences)));
            debug!(node = %id, "expansion applied");
            Outcome::Applied
        }
        _ => stale(id),
    }
}

/// Swap in the new text and discard descendants. A node expanded while the
/// regeneration was in flight still takes the new text: its children were
/// derived from the old one.
fn apply_regeneration(locked: &mut EngineState, id: &NodeId, text: String) -> Outcome {
    let Some(tree) = locked.tree.clone() else {
        return stale(id);
    };
    if locate(&tree, id).is_none() {
        return stale(id);
    }
    locked.tree = Some(replace(&tree, id, |node| node.regenerated(text)));
    debug!(node = %id, "regeneration applied");
    Outcome::Applied
}

fn stale(id: &NodeId) -> Outcome {
    debug!(node = %id, "dropping result for node no longer awaiting it");
    Outcome::Skipped(SkipReason::Stale)
}

/// Store the failure message, unless the node belongs to a discarded story.
fn record_failure(locked: &mut EngineState, id: &NodeId, error: &EngineError, what: &str) {
    warn!(node = %id, %error, "{} failed", what);
    let current = locked
        .tree
        .as_ref()
        .is_some_and(|tree| locate(tree, id).is_some());
    if current {
        locked.last_error = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ScriptedBackend;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use story_tree::Genre;

    fn setup() -> (ExpansionCoordinator<ScriptedBackend>, SharedState, NodeId) {
        let coordinator = ExpansionCoordinator::new(StoryGenerator::new(ScriptedBackend::new()));
        let root = StoryNode::root("A gardener wins a contest by accident.");
        let id = root.id().clone();
        let state = Mutex::new(EngineState {
            tree: Some(Arc::new(root)),
            ..EngineState::new(Genre::Any)
        });
        (coordinator, state, id)
    }

    fn backend(coordinator: &ExpansionCoordinator<ScriptedBackend>) -> &ScriptedBackend {
        coordinator.generator().backend()
    }

    fn tree(state: &SharedState) -> Arc<StoryNode> {
        state.lock().tree.clone().unwrap()
    }

    #[tokio::test]
    async fn test_expand_applies_triad() {
        let (coordinator, state, root) = setup();
        backend(&coordinator).push_expansions(&["B1", "B2", "B3"]);

        let outcome = coordinator.expand(&state, &root).await;

        assert_eq!(outcome, Ok(Outcome::Applied));
        let tree = tree(&state);
        assert!(tree.is_expanded());
        let texts: Vec<_> = tree.children().iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["B1", "B2", "B3"]);
        assert!(!state.lock().lifecycle.is_busy(&root));
    }

    #[tokio::test]
    async fn test_expand_with_children_toggles() {
        let (coordinator, state, root) = setup();
        backend(&coordinator).push_expansions(&["B1", "B2", "B3"]);
        coordinator.expand(&state, &root).await.unwrap();
        let children = tree(&state).children().to_vec();

        let outcome = coordinator.expand(&state, &root).await;

        assert_eq!(outcome, Ok(Outcome::Toggled));
        let collapsed = tree(&state);
        assert!(!collapsed.is_expanded());
        assert!(Arc::ptr_eq(&collapsed.children()[0], &children[0]));
        assert_eq!(backend(&coordinator).call_count(), 1);
    }

    #[tokio::test]
    async fn test_expand_unknown_node() {
        let (coordinator, state, _) = setup();
        let outcome = coordinator.expand(&state, &NodeId::from("ghost")).await;

        assert_eq!(outcome, Ok(Outcome::Skipped(SkipReason::NotFound)));
        assert_eq!(backend(&coordinator).call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_expand_leaves_tree_unchanged() {
        let (coordinator, state, root) = setup();
        let before = tree(&state);
        backend(&coordinator).push_status(503, "unavailable");

        let outcome = coordinator.expand(&state, &root).await;

        assert!(matches!(outcome, Err(EngineError::Transport { status: 503, .. })));
        assert!(Arc::ptr_eq(&before, &tree(&state)));
        let locked = state.lock();
        assert!(!locked.lifecycle.is_busy(&root));
        assert_eq!(
            locked.last_error.as_deref(),
            Some("API request failed: 503 - unavailable")
        );
    }

    #[tokio::test]
    async fn test_regenerate_root_rejected() {
        let (coordinator, state, root) = setup();

        let outcome = coordinator.regenerate(&state, &root).await;

        assert!(matches!(outcome, Err(EngineError::Validation(_))));
        assert_eq!(backend(&coordinator).call_count(), 0);
        assert!(state.lock().last_error.is_some());
    }

    #[tokio::test]
    async fn test_regenerate_uses_parent_text_and_beat() {
        let (coordinator, state, root) = setup();
        backend(&coordinator).push_expansions(&["B1", "B2", "B3"]);
        coordinator.expand(&state, &root).await.unwrap();
        let desenlace = tree(&state).children()[2].id().clone();

        backend(&coordinator).push_sentence("B3-alt");
        let outcome = coordinator.regenerate(&state, &desenlace).await;

        assert_eq!(outcome, Ok(Outcome::Applied));
        let prompt = backend(&coordinator).prompts().pop().unwrap();
        assert!(prompt.contains("A gardener wins a contest by accident."));
        assert!(prompt.contains("new DESENLACE sentence"));
        assert_eq!(tree(&state).children()[2].text(), "B3-alt");
    }

    #[tokio::test]
    async fn test_toggle_flips_without_generation() {
        let (coordinator, state, root) = setup();
        backend(&coordinator).push_expansions(&["B1", "B2", "B3"]);

        assert_eq!(coordinator.expand(&state, &root).await, Ok(Outcome::Applied));
        assert_eq!(coordinator.expand(&state, &root).await, Ok(Outcome::Toggled));
        assert!(!tree(&state).is_expanded());
        assert_eq!(coordinator.expand(&state, &root).await, Ok(Outcome::Toggled));
        assert!(tree(&state).is_expanded());

        assert_eq!(backend(&coordinator).call_count(), 1);
        assert!(!state.lock().lifecycle.is_busy(&root));
    }

    #[tokio::test]
    async fn test_no_story() {
        let coordinator = ExpansionCoordinator::new(StoryGenerator::new(ScriptedBackend::new()));
        let state = Mutex::new(EngineState::default());
        let id = NodeId::from("root");

        assert_eq!(
            coordinator.expand(&state, &id).await,
            Ok(Outcome::Skipped(SkipReason::NoStory))
        );
        assert_eq!(
            coordinator.regenerate(&state, &id).await,
            Ok(Outcome::Skipped(SkipReason::NoStory))
        );
    }
}
