//! Cast Engine — procedural casts and narrative arcs for small-town sims.
//!
//! Generates a cast of characters with demographics, marriages and a
//! weighted social graph, then picks a conclusion event for each new
//! narrative so that consecutive stories swing across a graph of moods.

pub mod core;
pub mod schema;

pub use crate::core::orchestrator::{NarrativeError, NarrativeOrchestrator};
