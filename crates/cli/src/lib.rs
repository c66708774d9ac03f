//! Library interface for the rankdup CLI
//!
//! This module exposes the pipeline entry points for integration testing while
//! keeping argument parsing and logging setup in main.rs.

pub mod duplicates;
pub mod evaluation;
pub mod report;

// Re-export commonly needed types for tests
pub use anyhow::Result;
pub use rankdup_core::config::Config;
pub use std::path::Path;
