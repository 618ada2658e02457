//! Validation of raw generator replies.
//!
//! Replies are decoded right at the collaborator boundary into a tagged
//! `Decoded` value; nothing of an unchecked shape reaches the coordinator.

use serde_json::Value;

use crate::error::EngineError;

/// Shape a reply is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// `{"expansions": [inicio, nudo, desenlace]}`
    Triple,
    /// `{"sentence": "..."}`
    Single,
}

/// A decoded generator reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Triple([String; 3]),
    Single(String),
    Failure(String),
}

impl Decoded {
    /// The three beat sentences, or a validation error.
    pub fn into_triple(self) -> Result<[String; 3], EngineError> {
        match self {
            Decoded::Triple(sentences) => Ok(sentences),
            Decoded::Single(_) => Err(EngineError::validation(
                "Invalid response format: expected 3 expansions",
            )),
            Decoded::Failure(reason) => Err(EngineError::Validation(reason)),
        }
    }

    /// The single replacement sentence, or a validation error.
    pub fn into_single(self) -> Result<String, EngineError> {
        match self {
            Decoded::Single(sentence) => Ok(sentence),
            Decoded::Triple(_) => Err(EngineError::validation(
                "Invalid response format: expected 1 sentence",
            )),
            Decoded::Failure(reason) => Err(EngineError::Validation(reason)),
        }
    }
}

/// Remove Markdown code fences models like to wrap JSON in.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn sentence(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Decode a raw completion into the expected shape.
pub fn decode(raw: &str, expected: Expected) -> Decoded {
    let cleaned = strip_fences(raw);
    let Ok(payload) = serde_json::from_str::<Value>(&cleaned) else {
        return Decoded::Failure("Failed to parse model response as JSON".to_string());
    };

    match expected {
        Expected::Triple => {
            let sentences: Option<Vec<String>> = payload
                .get("expansions")
                .and_then(Value::as_array)
                .and_then(|items| items.iter().map(sentence).collect());

            match sentences.map(<[String; 3]>::try_from) {
                Some(Ok(triple)) => Decoded::Triple(triple),
                _ => Decoded::Failure(
                    "Invalid response format: expected 3 expansions".to_string(),
                ),
            }
        }
        Expected::Single => match payload.get("sentence").and_then(sentence) {
            Some(text) => Decoded::Single(text),
            None => {
                Decoded::Failure("Invalid response format: expected 1 sentence".to_string())
            }
        },
    }
}
