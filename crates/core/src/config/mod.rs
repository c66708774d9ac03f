//! Configuration module for rankdup
//!
//! Every pipeline entry point receives an explicit [`Config`] (or one of its
//! sections). Configuration is loaded from a TOML file with environment
//! variable overrides; see [`Config::load`].

mod defaults;
mod loading;


use crate::error::{Error, Result};
use crate::types::QueryIdBase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.rankdup/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".rankdup").join("config.toml"))
}

/// Main configuration structure for rankdup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ranked-retrieval evaluation settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Settings for grading pre-computed search engine runs
    #[serde(default)]
    pub grading: GradingConfig,

    /// Tokenization and shingling settings
    #[serde(default)]
    pub shingling: ShinglingConfig,

    /// Near-duplicate scoring settings
    #[serde(default)]
    pub near_duplicates: NearDuplicatesConfig,

    /// Layout of the raw document corpus file
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Named datasets (queries + ground truth)
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetConfig>,

    /// Analyzer x scoring configurations to evaluate
    #[serde(default)]
    pub runs: Vec<RunConfig>,
}

/// Ranked-retrieval evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Cutoffs reported for precision@k and NDCG@k
    #[serde(default = "default_k_values")]
    pub k_values: Vec<usize>,

    /// Number of configurations kept when ranking runs by MRR
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Numbering of query ids in dataset files
    #[serde(default = "default_evaluation_query_id_base")]
    pub query_id_base: QueryIdBase,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            k_values: default_k_values(),
            top_n: default_top_n(),
            query_id_base: default_evaluation_query_id_base(),
        }
    }
}

/// Settings for grading pre-computed search engine runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Cutoff used for precision and recall
    #[serde(default = "default_grading_k")]
    pub k: usize,

    /// Numbering of query ids in the ground truth and result files
    #[serde(default = "default_grading_query_id_base")]
    pub query_id_base: QueryIdBase,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            k: default_grading_k(),
            query_id_base: default_grading_query_id_base(),
        }
    }
}

/// Tokenization and shingling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShinglingConfig {
    /// Number of tokens per shingle
    #[serde(default = "default_shingle_length")]
    pub length: usize,

    /// Emit one shingle of all tokens for documents shorter than `length`
    #[serde(default)]
    pub keep_short: bool,

    /// Replace hyphens with spaces before stripping punctuation
    #[serde(default)]
    pub remove_hyphens: bool,

    /// Keep apostrophes when stripping punctuation
    #[serde(default)]
    pub keep_apostrophes: bool,
}

impl Default for ShinglingConfig {
    fn default() -> Self {
        Self {
            length: default_shingle_length(),
            keep_short: false,
            remove_hyphens: false,
            keep_apostrophes: false,
        }
    }
}

/// Near-duplicate scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearDuplicatesConfig {
    /// Minimum Jaccard similarity for a pair to count as a near duplicate
    #[serde(default = "default_near_duplicate_threshold")]
    pub threshold: f64,
}

impl Default for NearDuplicatesConfig {
    fn default() -> Self {
        Self {
            threshold: default_near_duplicate_threshold(),
        }
    }
}

/// Layout of the raw document corpus file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Single-character field delimiter
    #[serde(default = "default_corpus_delimiter")]
    pub delimiter: String,

    /// Column holding the document id
    #[serde(default = "default_id_column")]
    pub id_column: usize,

    /// Column holding the document text
    #[serde(default = "default_text_column")]
    pub text_column: usize,

    /// Whether the first row is a header
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            delimiter: default_corpus_delimiter(),
            id_column: default_id_column(),
            text_column: default_text_column(),
            has_headers: default_has_headers(),
        }
    }
}

impl CorpusConfig {
    /// The delimiter as a single byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ if self.delimiter == "\\t" => Ok(b'\t'),
            _ => Err(Error::config(format!(
                "corpus.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}

/// Files making up one evaluation dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Two-column TSV of (query_id, query_text)
    pub queries: PathBuf,

    /// Two-column TSV of (query_id, relevant_doc_id)
    pub ground_truth: PathBuf,
}

/// One analyzer x scoring configuration whose ranked output is evaluated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Dataset name, a key of `datasets`
    pub dataset: String,

    /// Analyzer the index was built with
    #[serde(default = "default_analyzer")]
    pub analyzer: String,

    /// Scoring function name
    #[serde(default = "default_scoring")]
    pub scoring: String,

    /// BM25F `B` parameter
    #[serde(default)]
    pub b: Option<f64>,

    /// BM25F `K1` parameter
    #[serde(default)]
    pub k1: Option<f64>,

    /// Three-column TSV of (query_id, doc_id, rank) produced by the index
    pub results: PathBuf,
}

impl Config {
    /// Validates configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate k values
        if self.evaluation.k_values.is_empty() {
            return Err(Error::config(
                "evaluation.k_values must not be empty".to_string(),
            ));
        }
        if self.evaluation.k_values.contains(&0) {
            return Err(Error::config(format!(
                "evaluation.k_values must be greater than 0, got {:?}",
                self.evaluation.k_values
            )));
        }

        if self.evaluation.top_n == 0 {
            return Err(Error::config(
                "evaluation.top_n must be greater than 0".to_string(),
            ));
        }

        if self.grading.k == 0 {
            return Err(Error::config("grading.k must be greater than 0".to_string()));
        }

        if self.shingling.length == 0 {
            return Err(Error::config(
                "shingling.length must be greater than 0".to_string(),
            ));
        }

        let threshold = self.near_duplicates.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::config(format!(
                "near_duplicates.threshold must be within [0, 1], got {threshold}"
            )));
        }

        self.corpus.delimiter_byte()?;

        // Every run must point at a declared dataset
        for run in &self.runs {
            if !self.datasets.contains_key(&run.dataset) {
                return Err(Error::config(format!(
                    "Run '{}-{}' references unknown dataset '{}'. Known datasets: {:?}",
                    run.analyzer,
                    run.scoring,
                    run.dataset,
                    self.datasets.keys().collect::<Vec<_>>()
                )));
            }
        }

        Ok(())
    }
}
