//! Error taxonomy of the story engine.
//!
//! Every error is scoped to a single operation: none is retried and none
//! leaves the tree in a partially updated state.

use thiserror::Error;

/// Failure of one engine operation, displayed as-is to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Rejected input or a generator reply of the wrong shape.
    #[error("{0}")]
    Validation(String),

    /// The generation service answered with a non-success status, or could
    /// not be reached at all (`status` 0).
    #[error("API request failed: {status} - {body}")]
    Transport { status: u16, body: String },

    /// Placing text on the clipboard failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(error: reqwest::Error) -> Self {
        EngineError::Transport {
            status: error.status().map(|s| s.as_u16()).unwrap_or(0),
            body: error.to_string(),
        }
    }
}

/// Failure reported by a clipboard collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Failed to copy: {0}")]
pub struct ClipboardError(pub String);

/// Failure loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message() {
        let error = EngineError::Transport {
            status: 529,
            body: "overloaded".to_string(),
        };
        assert_eq!(error.to_string(), "API request failed: 529 - overloaded");
    }

    #[test]
    fn test_clipboard_message() {
        let error = EngineError::from(ClipboardError("denied".to_string()));
        assert_eq!(error.to_string(), "Failed to copy: denied");
    }
}
