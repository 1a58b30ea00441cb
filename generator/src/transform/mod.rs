//! Transformation module.
//!
//! - Normalize: raw rows to canonical records via the alias table
//! - Assemble: parent/child join and document fan-out
//! - Pipeline: the end-to-end run

pub mod assemble;
pub mod normalize;
pub mod pipeline;

pub use assemble::{assemble, ChildIndex, LevelDocuments};
pub use normalize::{normalize_row, normalize_rows};
pub use pipeline::*;
