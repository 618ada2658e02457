//! Genre hints for sentence generation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Genre selected for a story.
///
/// `Any` means no preference; every other genre is passed to the generator
/// as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    #[default]
    Any,
    Comedy,
    Drama,
    Adventure,
    Mystery,
    SciFi,
    Fantasy,
    Romance,
    Thriller,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown genre: {0}")]
pub struct UnknownGenre(pub String);

impl Genre {
    /// All genres in menu order.
    pub const ALL: [Genre; 9] = [
        Genre::Any,
        Genre::Comedy,
        Genre::Drama,
        Genre::Adventure,
        Genre::Mystery,
        Genre::SciFi,
        Genre::Fantasy,
        Genre::Romance,
        Genre::Thriller,
    ];

    /// Wire value, as used in configuration and prompts.
    pub fn value(&self) -> &'static str {
        match self {
            Genre::Any => "any",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Adventure => "adventure",
            Genre::Mystery => "mystery",
            Genre::SciFi => "sci-fi",
            Genre::Fantasy => "fantasy",
            Genre::Romance => "romance",
            Genre::Thriller => "thriller",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Any => "Any Genre",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Adventure => "Adventure",
            Genre::Mystery => "Mystery",
            Genre::SciFi => "Science Fiction",
            Genre::Fantasy => "Fantasy",
            Genre::Romance => "Romance",
            Genre::Thriller => "Thriller",
        }
    }

    /// The genre hint, or `None` when any genre is acceptable.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Genre::Any => None,
            other => Some(other.value()),
        }
    }
}

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.value() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
