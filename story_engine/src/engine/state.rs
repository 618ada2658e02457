//! Shared engine state.

use parking_lot::Mutex;
use std::sync::Arc;
use story_tree::{Genre, StoryNode};

use crate::lifecycle::LifecycleTracker;

/// Everything the engine shares between in-flight operations.
///
/// Always accessed through a `parking_lot::Mutex` whose guard is dropped
/// before any await point, so each synchronous step sees and publishes a
/// whole value.
#[derive(Debug, Default)]
pub struct EngineState {
    pub tree: Option<Arc<StoryNode>>,
    pub lifecycle: LifecycleTracker,
    pub genre: Genre,
    /// Message of the most recent failed operation.
    pub last_error: Option<String>,
}

impl EngineState {
    pub fn new(genre: Genre) -> Self {
        Self {
            genre,
            ..Self::default()
        }
    }

    /// Drop the story, every in-flight mark and the last error.
    pub fn reset(&mut self) {
        self.tree = None;
        self.lifecycle.clear();
        self.last_error = None;
    }
}

pub type SharedState = Mutex<EngineState>;
