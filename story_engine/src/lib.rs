//! # Story Engine
//!
//! Grows a `story_tree` asynchronously. Every node can be expanded into an
//! INICIO / NUDO / DESENLACE triple, regenerated, collapsed, or copied out as
//! flattened text, while several generation calls are in flight at once.
//!
//! ## Core Components
//!
//! - **lifecycle**: Which node ids have an expansion or regeneration in flight
//! - **coordinator**: One node operation from request to applied result
//! - **generation**: Prompting, completion backends and reply decoding
//! - **clipboard**: Destination for copied text
//! - **engine**: `TreeEngine`, the facade a rendering layer talks to
//!
//! ## Design Philosophy
//!
//! - **Replace, never mutate**: the tree is an immutable value swapped whole
//! - **Address by identity**: results land on a node id, or nowhere if it is gone
//! - **Fail per operation**: a failed call leaves the tree exactly as it was

pub mod clipboard;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod generation;
pub mod lifecycle;

pub use clipboard::*;
pub use config::*;
pub use coordinator::*;
pub use engine::*;
pub use error::*;
pub use generation::*;
pub use lifecycle::*;
