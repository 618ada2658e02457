//! # Story Tree
//!
//! The data layer of the fractal story system. A story is a tree of sentences
//! where every sentence may grow into exactly three children following the
//! INICIO / NUDO / DESENLACE triad.
//!
//! This crate is pure and synchronous: it owns the node model, the
//! identity-addressed lookup and replace operations, and the flattened text
//! export. It knows nothing about how sentences are generated.
//!
//! ## Core Components
//!
//! - **node**: `StoryNode`, `NodeId` and the `Beat` triad
//! - **genre**: Genre hints passed along to sentence generation
//! - **tree**: `locate` / `replace` over an immutable, structurally shared tree
//! - **export**: Indented, beat-tagged text rendering of the visible tree

pub mod export;
pub mod genre;
pub mod node;
pub mod tree;

pub use export::*;
pub use genre::*;
pub use node::*;
pub use tree::*;
