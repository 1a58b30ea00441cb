//! # Wilayah - static JSON API for Indonesian administrative regions
//!
//! Reads four CSV tables (provinces, regencies, districts, villages) and
//! writes a tree of JSON files that can be served by any static file host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV files  │────▶│   Parser    │────▶│  Transform  │────▶│   Output    │
//! │  (4 levels) │     │  (auto-enc) │     │ (alias+join)│     │ (JSON tree) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wilayah::{run, GeneratorOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let summary = run(&GeneratorOptions::default()).await.unwrap();
//!     println!("Wrote {} files", summary.files_written);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Region levels, records, documents
//! - [`parser`] - CSV loading with encoding detection
//! - [`transform`] - Normalization, join, pipeline
//! - [`output`] - JSON file writer
//! - [`logs`] - Console progress logging

// Core modules
pub mod error;
pub mod models;

// Stages
pub mod parser;
pub mod transform;
pub mod output;

// Console output
pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    LoadError,
    ReadFault,
    WriteError,
    WriteFault,
    PipelineError,
    LoadResult,
    WriteResult,
    PipelineResult,
};

pub use models::{
    RawRow,
    RegionLevel,
    Region,
    Dataset,
    Document,
};

pub use parser::{
    load_table,
    parse_str,
    parse_bytes,
    detect_encoding,
    decode_content,
    LoadOptions,
    LoadedTable,
};

pub use transform::{
    assemble,
    normalize_row,
    normalize_rows,
    ChildIndex,
    LevelDocuments,
    run,
    load_dataset,
    generate,
    GeneratorOptions,
    LevelCounts,
    RunSummary,
};

pub use output::{prepare_tree, write_document, write_all};
