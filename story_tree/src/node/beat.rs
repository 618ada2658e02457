//! The fixed narrative triad.

use serde::{Deserialize, Serialize};

/// Narrative role of a child sentence.
///
/// Every expansion produces exactly one child per beat, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Beat {
    /// How the situation begins.
    Inicio,
    /// What problem or complication arises.
    Nudo,
    /// How the situation resolves.
    Desenlace,
}

impl Beat {
    /// All beats in sibling order.
    pub const ALL: [Beat; 3] = [Beat::Inicio, Beat::Nudo, Beat::Desenlace];

    /// Zero-based position among siblings.
    pub fn index(&self) -> usize {
        match self {
            Beat::Inicio => 0,
            Beat::Nudo => 1,
            Beat::Desenlace => 2,
        }
    }

    /// Beat for a sibling position, if the position is part of the triad.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Upper-case tag used in prompts and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Beat::Inicio => "INICIO",
            Beat::Nudo => "NUDO",
            Beat::Desenlace => "DESENLACE",
        }
    }

    /// Short guiding question for the beat.
    pub fn description(&self) -> &'static str {
        match self {
            Beat::Inicio => "¿Cómo comienza? Situación inicial, presentación",
            Beat::Nudo => "¿Qué problema surge? Conflicto, complicación",
            Beat::Desenlace => "¿Cómo se resuelve? Resolución, conclusión",
        }
    }
}

impl std::fmt::Display for Beat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
