//! Completion backends: the transport side of sentence generation.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::error::EngineError;

/// A text-completion service.
///
/// Implementations return the raw completion text. A non-success reply is a
/// `Transport` error; checking the shape of the text is left to the decoder.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        (**self).complete(prompt).await
    }
}

/// A reply queued on a [`ScriptedBackend`].
#[derive(Debug)]
pub enum ScriptedReply {
    /// Completion text returned immediately.
    Text(String),
    /// Non-success status returned immediately.
    Status { status: u16, body: String },
    /// Completion text delivered later through the paired sender. Dropping
    /// the sender fails the call.
    Deferred(oneshot::Receiver<String>),
}

/// Offline backend replaying queued replies in call order.
///
/// Every prompt it receives is recorded, which makes it suitable for tests
/// and demos where no generation service is available.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn push(&self, reply: ScriptedReply) {
        self.replies.lock().push_back(reply);
    }

    /// Queue raw completion text.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(ScriptedReply::Text(text.into()));
    }

    /// Queue a well-formed expansion reply.
    pub fn push_expansions(&self, sentences: &[&str]) {
        self.push_text(json!({ "expansions": sentences }).to_string());
    }

    /// Queue a well-formed regeneration reply.
    pub fn push_sentence(&self, sentence: &str) {
        self.push_text(json!({ "sentence": sentence }).to_string());
    }

    /// Queue a non-success status.
    pub fn push_status(&self, status: u16, body: impl Into<String>) {
        self.push(ScriptedReply::Status {
            status,
            body: body.into(),
        });
    }

    /// Queue a reply that resolves when the returned sender is used.
    pub fn push_deferred(&self) -> oneshot::Sender<String> {
        let (sender, receiver) = oneshot::channel();
        self.push(ScriptedReply::Deferred(receiver));
        sender
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Number of queued replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        self.prompts.lock().push(prompt.to_string());
        let reply = self.replies.lock().pop_front();

        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Status { status, body }) => {
                Err(EngineError::Transport { status, body })
            }
            Some(ScriptedReply::Deferred(receiver)) => {
                receiver.await.map_err(|_| EngineError::Transport {
                    status: 0,
                    body: "scripted reply was dropped".to_string(),
                })
            }
            None => Err(EngineError::Transport {
                status: 0,
                body: "no scripted reply left".to_string(),
            }),
        }
    }
}
