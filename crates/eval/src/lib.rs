//! Ranked-retrieval evaluation
//!
//! Compares ranked result lists against binary relevance judgments:
//!
//! - **Per-query metrics**: reciprocal rank, precision@k, recall@k, NDCG@k
//! - **Aggregates**: MRR, mean NDCG, quartile summaries, mean F-score
//! - **Records**: labeled metric bundles per analyzer x scoring configuration
//! - **Search seam**: traits for driving an external full-text index
//! - **Datasets**: loaders for query, ground-truth and ranked-result files

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod aggregate;
pub mod dataset;
pub mod record;
pub mod relevance;
pub mod scoring;
pub mod search;

pub use aggregate::{
    compute_stats, mean_f_score, mean_ndcg, mean_reciprocal_rank, precision_per_query,
    queries_with_ground_truth, recall_per_query, results_for_queries, results_with_ground_truth,
    SummaryStats,
};
pub use dataset::{
    load_ground_truth, load_ground_truth_file, load_queries, load_queries_file,
    load_ranked_results, load_ranked_results_file, Dataset,
};
pub use record::{top_by_mrr, ConfigurationLabel, MetricRecord};
pub use relevance::{
    f_score, normalized_dcg, precision_at_k, recall_at_k, reciprocal_rank, Cutoff,
    PrecisionConvention, RecallClamp,
};
pub use scoring::{
    AnalyzerKind, ScoringFactory, ScoringKind, ScoringParams, ScoringRegistry, DEFAULT_BM25F_B,
    DEFAULT_BM25F_K1,
};
pub use search::{collect_result_lists, SearchIndex, SearchSession, StoredDocument};
