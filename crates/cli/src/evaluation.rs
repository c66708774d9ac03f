//! `evaluate` and `grade` pipelines

use anyhow::{bail, Context, Result};
use rankdup_core::{Config, Error, GradingConfig};
use rankdup_eval::{
    compute_stats, load_ground_truth_file, load_ranked_results_file, mean_f_score,
    precision_per_query, recall_per_query, results_for_queries, results_with_ground_truth,
    top_by_mrr, AnalyzerKind, ConfigurationLabel, Cutoff, Dataset, MetricRecord,
    PrecisionConvention, RecallClamp, ScoringParams, ScoringRegistry, SummaryStats,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Compute a [`MetricRecord`] for every configured run, optionally limited to
/// one dataset. Each dataset is loaded once.
///
/// Metrics cover the dataset's judged queries: a judged query missing from a
/// run's results counts as an empty ranking.
pub fn evaluate_runs(config: &Config, dataset_filter: Option<&str>) -> Result<Vec<MetricRecord>> {
    if let Some(name) = dataset_filter {
        if !config.datasets.contains_key(name) {
            bail!("Unknown dataset '{name}'");
        }
    }

    let runs: Vec<_> = config
        .runs
        .iter()
        .filter(|run| dataset_filter.is_none_or(|name| run.dataset == name))
        .collect();
    if runs.is_empty() {
        bail!("No runs configured. Add [[runs]] entries to the configuration file.");
    }

    let registry = ScoringRegistry::with_defaults();
    let base = config.evaluation.query_id_base;
    let mut datasets: BTreeMap<&str, Dataset> = BTreeMap::new();
    let mut records = Vec::with_capacity(runs.len());

    for run in runs {
        if !datasets.contains_key(run.dataset.as_str()) {
            let dataset_config = config
                .datasets
                .get(&run.dataset)
                .with_context(|| format!("Unknown dataset '{}'", run.dataset))?;
            let dataset = Dataset::load(&run.dataset, dataset_config, base)
                .with_context(|| format!("Failed to load dataset '{}'", run.dataset))?;
            datasets.insert(run.dataset.as_str(), dataset);
        }
        let dataset = datasets
            .get(run.dataset.as_str())
            .with_context(|| format!("Dataset '{}' was not loaded", run.dataset))?;

        let analyzer = AnalyzerKind::parse(&run.analyzer)?;
        let scoring = registry.build(&run.scoring, &ScoringParams::with_overrides(run.b, run.k1))?;
        let label = ConfigurationLabel::new(analyzer, scoring, run.dataset.clone());

        let results = load_ranked_results_file(&run.results, base)
            .with_context(|| format!("Failed to load results for {label}"))?;
        let unanswered = dataset
            .queries
            .keys()
            .filter(|&&id| results.get(id).is_none())
            .count();
        if unanswered > 0 {
            warn!("{}: no results for {} judged queries", label, unanswered);
        }
        let judged = results_for_queries(&results, &dataset.queries);

        let k_values = &config.evaluation.k_values;
        let record = MetricRecord::compute(label, &judged, &dataset.ground_truth, k_values)
            .with_context(|| format!("Failed to evaluate {}", run.results.display()))?;
        info!("{} on {}: MRR {:.3}", record.label(), run.dataset, record.mrr());
        records.push(record);
    }

    Ok(records)
}

/// The best `n` records by MRR, per dataset
pub fn top_per_dataset(records: &[MetricRecord], n: usize) -> BTreeMap<&str, Vec<&MetricRecord>> {
    let mut by_dataset: BTreeMap<&str, Vec<&MetricRecord>> = BTreeMap::new();
    for record in records {
        by_dataset
            .entry(record.label().dataset.as_str())
            .or_default()
            .push(record);
    }

    by_dataset
        .into_iter()
        .map(|(dataset, group)| (dataset, top_by_mrr(group, n)))
        .collect()
}

/// Grades of one search engine's ranked output
#[derive(Debug, Clone, Serialize)]
pub struct EngineGrade {
    pub name: String,
    pub precision: SummaryStats,
    pub recall: SummaryStats,
    /// `None` when no query has a defined F-score
    pub mean_f_score: Option<f64>,
}

/// Precision@k and recall@k (both clamped to the number of relevant
/// documents) for each results file, against one ground truth.
pub fn grade_engines(
    ground_truth: &Path,
    results: &[PathBuf],
    grading: &GradingConfig,
) -> Result<Vec<EngineGrade>> {
    let relevant = load_ground_truth_file(ground_truth, grading.query_id_base)
        .with_context(|| format!("Failed to load ground truth {}", ground_truth.display()))?;
    let cutoff = Cutoff::Top(grading.k);

    results
        .iter()
        .map(|path| -> Result<EngineGrade> {
            let ranked = load_ranked_results_file(path, grading.query_id_base)
                .with_context(|| format!("Failed to load results {}", path.display()))?;
            let judged = results_with_ground_truth(&ranked, &relevant);

            let precision = precision_per_query(
                &judged,
                &relevant,
                cutoff,
                PrecisionConvention::ClampedCutoff,
            )?;
            let recall = recall_per_query(&judged, &relevant, cutoff, RecallClamp::ToRelevant)?;

            let mean_f_score = match mean_f_score(&precision, &recall) {
                Ok(score) => Some(score),
                Err(Error::DivisionUndefined(_)) => None,
                Err(e) => return Err(e.into()),
            };

            Ok(EngineGrade {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                precision: compute_stats(&precision)
                    .with_context(|| format!("No judged queries in {}", path.display()))?,
                recall: compute_stats(&recall)?,
                mean_f_score,
            })
        })
        .collect()
}
