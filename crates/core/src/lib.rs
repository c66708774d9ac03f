//! Core types for the rankdup retrieval-evaluation and duplicate-detection tools
//!
//! This crate provides the foundations shared by the evaluation and
//! deduplication pipelines:
//!
//! - **Data model**: queries, relevance sets and ranked result lists
//! - **Configuration**: explicit configuration passed into every pipeline
//! - **Delimited files**: fail-fast TSV/CSV readers and writers
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;
pub mod tsv;
pub mod types;

// Re-export main types for convenience
pub use config::{
    Config, CorpusConfig, DatasetConfig, EvaluationConfig, GradingConfig, NearDuplicatesConfig,
    RunConfig, ShinglingConfig,
};
pub use error::{Error, Result, ResultExt};
pub use types::{DocId, Query, QueryId, QueryIdBase, RelevanceSet, ResultList};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::types::{DocId, QueryId, RelevanceSet, ResultList};
}
