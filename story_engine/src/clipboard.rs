//! Clipboard collaborator used by the copy intents.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::ClipboardError;

/// Destination for copied story text.
///
/// Implementations report failure instead of swallowing it.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[async_trait]
impl<T: Clipboard + ?Sized> Clipboard for Arc<T> {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text).await
    }
}

/// In-process clipboard keeping the last copied text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text successfully written.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }

    /// Make every following write fail with `reason`, or succeed again with
    /// `None`.
    pub fn set_failure(&self, reason: Option<&str>) {
        *self.failure.lock() = reason.map(str::to_string);
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = self.failure.lock().clone() {
            return Err(ClipboardError(reason));
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}
