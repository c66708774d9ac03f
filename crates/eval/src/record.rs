//! Labeled metric bundles for one analyzer x scoring x dataset configuration

use crate::aggregate::{
    compute_stats, mean_ndcg, mean_reciprocal_rank, precision_per_query, recall_per_query,
    SummaryStats,
};
use crate::relevance::{Cutoff, PrecisionConvention, RecallClamp};
use crate::scoring::{AnalyzerKind, ScoringKind};
use rankdup_core::{Error, RelevanceSet, Result, ResultList};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies the configuration a [`MetricRecord`] was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationLabel {
    pub analyzer: AnalyzerKind,
    pub scoring: ScoringKind,
    pub dataset: String,
}

impl ConfigurationLabel {
    pub fn new(analyzer: AnalyzerKind, scoring: ScoringKind, dataset: impl Into<String>) -> Self {
        Self {
            analyzer,
            scoring,
            dataset: dataset.into(),
        }
    }
}

/// `analyzer-scoring`, the name used when comparing configurations
impl fmt::Display for ConfigurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.analyzer, self.scoring)
    }
}

/// All metrics for one configuration run.
///
/// Built once by [`MetricRecord::compute`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    label: ConfigurationLabel,
    queries: usize,
    mrr: f64,
    precision_at_k: BTreeMap<usize, f64>,
    ndcg_at_k: BTreeMap<usize, f64>,
    r_precision: SummaryStats,
}

impl MetricRecord {
    /// Compute every metric for `results` against `relevant`.
    ///
    /// Precision@k uses [`PrecisionConvention::CutoffDenominator`] and is
    /// averaged over queries; R-precision is recall at
    /// [`Cutoff::RelevantCount`], summarized with [`compute_stats`].
    ///
    /// # Errors
    ///
    /// Propagates [`Error::MissingKey`] if a query in `results` has no ground
    /// truth, and fails with [`Error::InvalidInput`] if `k_values` is empty.
    pub fn compute(
        label: ConfigurationLabel,
        results: &ResultList,
        relevant: &RelevanceSet,
        k_values: &[usize],
    ) -> Result<Self> {
        if k_values.is_empty() {
            return Err(Error::invalid_input("no k values to evaluate".to_string()));
        }

        let mrr = mean_reciprocal_rank(results, relevant)?;

        let r_precision = compute_stats(&recall_per_query(
            results,
            relevant,
            Cutoff::RelevantCount,
            RecallClamp::None,
        )?)?;

        let mut precision_at_k = BTreeMap::new();
        let mut ndcg_at_k = BTreeMap::new();
        for &k in k_values {
            let precision = precision_per_query(
                results,
                relevant,
                Cutoff::Top(k),
                PrecisionConvention::CutoffDenominator,
            )?;
            precision_at_k.insert(k, compute_stats(&precision)?.mean);
            ndcg_at_k.insert(k, mean_ndcg(results, relevant, Cutoff::Top(k))?);
        }

        tracing::debug!(
            "Computed metrics for {} on {} ({} queries): MRR {:.3}",
            label,
            label.dataset,
            results.len(),
            mrr
        );

        Ok(Self {
            label,
            queries: results.len(),
            mrr,
            precision_at_k,
            ndcg_at_k,
            r_precision,
        })
    }

    pub fn label(&self) -> &ConfigurationLabel {
        &self.label
    }

    /// Number of queries the metrics were averaged over
    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn mrr(&self) -> f64 {
        self.mrr
    }

    pub fn precision_at_k(&self) -> &BTreeMap<usize, f64> {
        &self.precision_at_k
    }

    pub fn ndcg_at_k(&self) -> &BTreeMap<usize, f64> {
        &self.ndcg_at_k
    }

    pub fn r_precision(&self) -> &SummaryStats {
        &self.r_precision
    }

    /// Human-readable multi-line summary
    pub fn report(&self) -> String {
        let format_at_k = |values: &BTreeMap<usize, f64>| {
            values
                .iter()
                .map(|(k, v)| format!("@{k}={v:.3}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let rps = &self.r_precision;

        [
            format!("Configuration: {}", self.label),
            format!("Dataset: {}", self.label.dataset),
            format!("Queries: {}", self.queries),
            format!("P@k {}", format_at_k(&self.precision_at_k)),
            format!("NDCG@k {}", format_at_k(&self.ndcg_at_k)),
            format!("MRR: {:.3}", self.mrr),
            "[R-Precision]".to_string(),
            format!("Mean: \t\t {:.3}", rps.mean),
            format!("Min: \t\t {:.3}", rps.min),
            format!("1st quartile:\t {:.3}", rps.first_quartile),
            format!("Median: \t {:.3}", rps.median),
            format!("3rd quartile:\t {:.3}", rps.third_quartile),
            format!("Max:\t\t {:.3}", rps.max),
        ]
        .join("\n")
    }
}

/// The `n` records with the highest MRR, best first.
///
/// Ties keep their input order.
pub fn top_by_mrr<'a, I>(records: I, n: usize) -> Vec<&'a MetricRecord>
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    let mut ranked: Vec<&MetricRecord> = records.into_iter().collect();
    ranked.sort_by(|a, b| b.mrr.total_cmp(&a.mrr));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(scoring: ScoringKind) -> ConfigurationLabel {
        ConfigurationLabel::new(AnalyzerKind::Stemming, scoring, "cranfield")
    }

    fn fixture() -> (ResultList, RelevanceSet) {
        let results: ResultList = [(0, vec![1, 2, 3]), (1, vec![9, 4, 5])]
            .into_iter()
            .collect();
        let relevant: RelevanceSet = [(0, 1), (0, 3), (1, 4)].into_iter().collect();
        (results, relevant)
    }

    #[test]
    fn test_label_display() {
        assert_eq!(
            label(ScoringKind::Bm25f { b: 0.8, k1: 1.5 }).to_string(),
            "stemming-bm25f(0.8,1.5)"
        );
    }

    #[test]
    fn test_compute_record() {
        let (results, relevant) = fixture();
        let record =
            MetricRecord::compute(label(ScoringKind::TfIdf), &results, &relevant, &[1, 3]).unwrap();

        assert_eq!(record.queries(), 2);
        assert!((record.mrr() - 0.75).abs() < 1e-9);
        // P@1: q0 hit, q1 miss
        assert!((record.precision_at_k()[&1] - 0.5).abs() < 1e-9);
        // P@3: q0 2/3, q1 1/3
        assert!((record.precision_at_k()[&3] - 0.5).abs() < 1e-9);
        assert_eq!(record.ndcg_at_k().len(), 2);
        // R-precision: q0 top2 = {1,2} -> 1/2, q1 top1 = {9} -> 0
        assert!((record.r_precision().max - 0.5).abs() < 1e-9);
        assert!((record.r_precision().min - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_requires_k_values() {
        let (results, relevant) = fixture();
        let err =
            MetricRecord::compute(label(ScoringKind::TfIdf), &results, &relevant, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_report_contains_sections() {
        let (results, relevant) = fixture();
        let record =
            MetricRecord::compute(label(ScoringKind::Frequency), &results, &relevant, &[1])
                .unwrap();

        let report = record.report();
        assert!(report.contains("Configuration: stemming-frequency"));
        assert!(report.contains("MRR: 0.750"));
        assert!(report.contains("[R-Precision]"));
        assert!(report.contains("P@k @1=0.500"));
    }

    #[test]
    fn test_top_by_mrr() {
        let (results, relevant) = fixture();
        let good =
            MetricRecord::compute(label(ScoringKind::TfIdf), &results, &relevant, &[1]).unwrap();

        let worse_results: ResultList = [(0, vec![2, 1]), (1, vec![5, 9, 4])]
            .into_iter()
            .collect();
        let worse =
            MetricRecord::compute(label(ScoringKind::Frequency), &worse_results, &relevant, &[1])
                .unwrap();

        let records = vec![worse.clone(), good.clone()];
        let top = top_by_mrr(&records, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0], &good);

        assert_eq!(top_by_mrr(&records, 10).len(), 2);
    }

    #[test]
    fn test_record_json_roundtrip_keeps_label() {
        let (results, relevant) = fixture();
        let record = MetricRecord::compute(
            label(ScoringKind::Bm25f { b: 0.75, k1: 1.2 }),
            &results,
            &relevant,
            &[1, 3],
        )
        .unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let decoded: MetricRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.label(), record.label());
        assert_eq!(decoded.precision_at_k().len(), 2);
    }
}
