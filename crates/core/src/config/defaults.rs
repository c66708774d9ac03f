//! Default values and functions for configuration

use crate::types::QueryIdBase;

// Default constants
pub(crate) const DEFAULT_CORPUS_DELIMITER: &str = ",";
pub(crate) const DEFAULT_ANALYZER: &str = "simple";
pub(crate) const DEFAULT_SCORING: &str = "frequency";

pub(crate) fn default_k_values() -> Vec<usize> {
    vec![1, 3, 5, 10]
}

pub(crate) fn default_top_n() -> usize {
    5
}

pub(crate) fn default_evaluation_query_id_base() -> QueryIdBase {
    QueryIdBase::OneBased
}

pub(crate) fn default_grading_k() -> usize {
    4
}

pub(crate) fn default_grading_query_id_base() -> QueryIdBase {
    QueryIdBase::ZeroBased
}

pub(crate) fn default_shingle_length() -> usize {
    3
}

pub(crate) fn default_near_duplicate_threshold() -> f64 {
    0.8
}

pub(crate) fn default_corpus_delimiter() -> String {
    DEFAULT_CORPUS_DELIMITER.to_string()
}

pub(crate) fn default_id_column() -> usize {
    0
}

pub(crate) fn default_text_column() -> usize {
    5 // lyrics column of the MetroLyrics dump
}

pub(crate) fn default_has_headers() -> bool {
    true
}

pub(crate) fn default_analyzer() -> String {
    DEFAULT_ANALYZER.to_string()
}

pub(crate) fn default_scoring() -> String {
    DEFAULT_SCORING.to_string()
}
