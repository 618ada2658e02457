//! Tree Engine - the facade consumed by a rendering layer.
//!
//! The engine accepts user intents (start, toggle, expand, regenerate, copy,
//! reset) and exposes read-only snapshots of the tree and of the in-flight
//! operation sets. Intents take `&self`, so several of them may be awaited
//! at the same time, e.g. through `tokio::join!`.

mod state;

pub use state::*;

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use story_tree::{locate, render_document, serialize, Genre, NodeId, StoryNode};
use tracing::{info, warn};

use crate::clipboard::Clipboard;
use crate::config::{EngineConfig, ExportConfig};
use crate::coordinator::{ExpansionCoordinator, Outcome, SkipReason};
use crate::error::EngineError;
use crate::generation::{AnthropicBackend, CompletionBackend, StoryGenerator};
use crate::lifecycle::OperationKind;

/// The story tree engine.
pub struct TreeEngine<B, C> {
    state: SharedState,
    coordinator: ExpansionCoordinator<B>,
    clipboard: C,
    export: ExportConfig,
}

impl<C: Clipboard> TreeEngine<AnthropicBackend, C> {
    /// Create an engine generating through the configured messages API.
    pub fn with_anthropic(clipboard: C, config: &EngineConfig) -> Self {
        Self::new(
            AnthropicBackend::new(config.generation.clone()),
            clipboard,
            config,
        )
    }
}

impl<B: CompletionBackend, C: Clipboard> TreeEngine<B, C> {
    pub fn new(backend: B, clipboard: C, config: &EngineConfig) -> Self {
        Self {
            state: Mutex::new(EngineState::new(config.default_genre)),
            coordinator: ExpansionCoordinator::new(StoryGenerator::new(backend)),
            clipboard,
            export: config.export.clone(),
        }
    }

    pub fn backend(&self) -> &B {
        self.coordinator.generator().backend()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Start a new story from a premise and expand its root.
    ///
    /// The previous story, if any, is replaced and its in-flight marks are
    /// forgotten. Results still in flight for it are dropped when they arrive.
    pub async fn start_story(&self, premise: &str, genre: Genre) -> Result<Outcome, EngineError> {
        let premise = premise.trim();
        if premise.is_empty() {
            return Err(EngineError::validation("Please enter a story premise"));
        }

        let root_id = {
            let mut locked = self.state.lock();
            let root = StoryNode::root(premise);
            let id = root.id().clone();
            locked.tree = Some(Arc::new(root));
            locked.lifecycle.clear();
            locked.genre = genre;
            locked.last_error = None;
            id
        };

        info!(root = %root_id, genre = %genre, "story started");
        self.coordinator.expand(&self.state, &root_id).await
    }

    /// Show or hide a node's children, generating them on first use.
    pub async fn toggle(&self, id: &NodeId) -> Result<Outcome, EngineError> {
        self.coordinator.expand(&self.state, id).await
    }

    /// Replace a node's sentence with a new one for the same beat.
    pub async fn regenerate(&self, id: &NodeId) -> Result<Outcome, EngineError> {
        self.coordinator.regenerate(&self.state, id).await
    }

    /// Copy one node's sentence to the clipboard.
    pub async fn copy(&self, id: &NodeId) -> Result<Outcome, EngineError> {
        let text = {
            let locked = self.state.lock();
            let Some(tree) = locked.tree.as_ref() else {
                return Ok(Outcome::Skipped(SkipReason::NoStory));
            };
            match locate(tree, id) {
                Some(node) => node.text().to_string(),
                None => return Ok(Outcome::Skipped(SkipReason::NotFound)),
            }
        };

        self.write_clipboard(&text).await
    }

    /// Copy the visible story, under its export header, to the clipboard.
    pub async fn copy_all(&self) -> Result<Outcome, EngineError> {
        let Some(document) = self.export_document() else {
            return Ok(Outcome::Skipped(SkipReason::NoStory));
        };
        self.write_clipboard(&document).await
    }

    async fn write_clipboard(&self, text: &str) -> Result<Outcome, EngineError> {
        match self.clipboard.write_text(text).await {
            Ok(()) => Ok(Outcome::Copied),
            Err(error) => {
                let error = EngineError::from(error);
                warn!(%error, "copy failed");
                self.state.lock().last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Drop the story and forget every in-flight operation.
    pub fn reset(&self) {
        self.state.lock().reset();
        info!("story reset");
    }

    pub fn set_genre(&self, genre: Genre) {
        self.state.lock().genre = genre;
    }

    pub fn genre(&self) -> Genre {
        self.state.lock().genre
    }

    /// Current tree, if a story was started.
    pub fn snapshot(&self) -> Option<Arc<StoryNode>> {
        self.state.lock().tree.clone()
    }

    /// Copy of the node with the given id in the current tree.
    pub fn node(&self, id: &NodeId) -> Option<StoryNode> {
        let tree = self.snapshot()?;
        locate(&tree, id).cloned()
    }

    pub fn expanding(&self) -> HashSet<NodeId> {
        self.state
            .lock()
            .lifecycle
            .marked(OperationKind::Expanding)
            .clone()
    }

    pub fn regenerating(&self) -> HashSet<NodeId> {
        self.state
            .lock()
            .lifecycle
            .marked(OperationKind::Regenerating)
            .clone()
    }

    pub fn is_expanding(&self, id: &NodeId) -> bool {
        self.state
            .lock()
            .lifecycle
            .is_marked(OperationKind::Expanding, id)
    }

    pub fn is_regenerating(&self, id: &NodeId) -> bool {
        self.state
            .lock()
            .lifecycle
            .is_marked(OperationKind::Regenerating, id)
    }

    /// Message of the most recent failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.state.lock().last_error = None;
    }

    /// Visible story as indented, beat-tagged text.
    pub fn export_text(&self) -> Option<String> {
        self.snapshot().map(|tree| serialize(&tree))
    }

    /// Visible story under the configured export header.
    pub fn export_document(&self) -> Option<String> {
        self.snapshot()
            .map(|tree| render_document(&tree, &self.export.title, self.export.rule_width))
    }
}
