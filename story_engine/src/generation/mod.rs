//! Sentence generation collaborator.
//!
//! Generation is layered in three steps:
//! 1. **Prompting**: render the expansion or regeneration prompt
//! 2. **Transport**: send it through a `CompletionBackend`
//! 3. **Decoding**: validate the raw reply into exactly the expected shape

mod anthropic;
mod backend;
pub mod decode;
pub mod prompt;

pub use anthropic::*;
pub use backend::*;
pub use decode::{Decoded, Expected};

use story_tree::{Beat, Genre};

use crate::error::EngineError;

/// Generates beat sentences through a completion backend.
#[derive(Debug)]
pub struct StoryGenerator<B> {
    backend: B,
}

impl<B: CompletionBackend> StoryGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate the INICIO, NUDO and DESENLACE sentences continuing
    /// `sentence`.
    pub async fn expand(&self, sentence: &str, genre: Genre) -> Result<[String; 3], EngineError> {
        let prompt = prompt::expansion_prompt(sentence, genre);
        let raw = self.backend.complete(&prompt).await?;
        decode::decode(&raw, Expected::Triple).into_triple()
    }

    /// Generate a replacement sentence for one beat of `parent`.
    pub async fn regenerate(
        &self,
        parent: &str,
        beat: Beat,
        genre: Genre,
    ) -> Result<String, EngineError> {
        let prompt = prompt::regeneration_prompt(parent, beat, genre);
        let raw = self.backend.complete(&prompt).await?;
        decode::decode(&raw, Expected::Single).into_single()
    }
}
