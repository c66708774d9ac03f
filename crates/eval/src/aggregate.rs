//! Aggregation of per-query metrics over a query set.

use crate::relevance::{
    f_score, normalized_dcg, precision_at_k, recall_at_k, reciprocal_rank, Cutoff,
    PrecisionConvention, RecallClamp,
};
use rankdup_core::{DocId, Error, Query, QueryId, RelevanceSet, Result, ResultList};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Order statistics of a set of per-query values.
///
/// Quartiles use linear interpolation between the closest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub first_quartile: f64,
    pub third_quartile: f64,
}

impl SummaryStats {
    /// Compute statistics over raw values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if `values` is empty.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::empty_input(
                "cannot compute statistics over zero values".to_string(),
            ));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        Ok(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median: quantile(&sorted, 0.5),
            first_quartile: quantile(&sorted, 0.25),
            third_quartile: quantile(&sorted, 0.75),
        })
    }
}

/// Compute summary statistics over a map of per-query values.
pub fn compute_stats<K>(values: &BTreeMap<K, f64>) -> Result<SummaryStats> {
    let values: Vec<f64> = values.values().copied().collect();
    SummaryStats::from_values(&values)
}

/// Linear-interpolated quantile of an ascending, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Relevant documents for `query_id`, or [`Error::MissingKey`]
fn ground_truth_for(relevant: &RelevanceSet, query_id: QueryId) -> Result<&HashSet<DocId>> {
    relevant.get(query_id).ok_or_else(|| {
        Error::missing_key(format!("query {query_id} has results but no ground truth"))
    })
}

/// Apply a per-query metric to every query in `results`
fn per_query<F>(
    results: &ResultList,
    relevant: &RelevanceSet,
    mut metric: F,
) -> Result<BTreeMap<QueryId, f64>>
where
    F: FnMut(&[DocId], &HashSet<DocId>) -> Result<f64>,
{
    results
        .iter()
        .map(|(query_id, ranking)| {
            let gt = ground_truth_for(relevant, query_id)?;
            Ok((query_id, metric(ranking, gt)?))
        })
        .collect()
}

fn mean_over_queries(values: &BTreeMap<QueryId, f64>, metric: &str) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::division_undefined(format!(
            "{metric} over zero queries"
        )));
    }
    Ok(values.values().sum::<f64>() / values.len() as f64)
}

/// Mean reciprocal rank over every query in `results`.
///
/// Every query in `results` must have ground truth; filter with
/// [`results_with_ground_truth`] first when that is not guaranteed.
///
/// # Errors
///
/// - [`Error::MissingKey`] if a query has no ground truth
/// - [`Error::DivisionUndefined`] if `results` is empty
pub fn mean_reciprocal_rank(results: &ResultList, relevant: &RelevanceSet) -> Result<f64> {
    let ranks = per_query(results, relevant, |ranking, gt| {
        Ok(reciprocal_rank(ranking, gt))
    })?;
    mean_over_queries(&ranks, "mean reciprocal rank")
}

/// Mean NDCG at `cutoff` over every query in `results`.
pub fn mean_ndcg(results: &ResultList, relevant: &RelevanceSet, cutoff: Cutoff) -> Result<f64> {
    let gains = per_query(results, relevant, |ranking, gt| {
        normalized_dcg(ranking, gt, cutoff)
    })?;
    mean_over_queries(&gains, "mean NDCG")
}

/// Precision at `cutoff` for every query in `results`.
pub fn precision_per_query(
    results: &ResultList,
    relevant: &RelevanceSet,
    cutoff: Cutoff,
    convention: PrecisionConvention,
) -> Result<BTreeMap<QueryId, f64>> {
    per_query(results, relevant, |ranking, gt| {
        precision_at_k(ranking, gt, cutoff, convention)
    })
}

/// Recall at `cutoff` for every query in `results`.
pub fn recall_per_query(
    results: &ResultList,
    relevant: &RelevanceSet,
    cutoff: Cutoff,
    clamp: RecallClamp,
) -> Result<BTreeMap<QueryId, f64>> {
    per_query(results, relevant, |ranking, gt| {
        recall_at_k(ranking, gt, cutoff, clamp)
    })
}

/// Mean F-score over queries where it is defined.
///
/// Queries whose precision and recall are both zero have no F-score and are
/// left out of the mean.
///
/// # Errors
///
/// - [`Error::MissingKey`] if a query appears in `precision` but not in `recall`
/// - [`Error::DivisionUndefined`] if no query has a defined F-score
pub fn mean_f_score(
    precision: &BTreeMap<QueryId, f64>,
    recall: &BTreeMap<QueryId, f64>,
) -> Result<f64> {
    let mut scores = Vec::with_capacity(precision.len());

    for (query_id, p) in precision {
        let r = recall.get(query_id).ok_or_else(|| {
            Error::missing_key(format!("query {query_id} has precision but no recall"))
        })?;
        if let Some(score) = f_score(*p, *r) {
            scores.push(score);
        }
    }

    if scores.is_empty() {
        return Err(Error::division_undefined(
            "no query has a defined F-score".to_string(),
        ));
    }

    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Keep only the queries that have ground truth.
pub fn queries_with_ground_truth(
    queries: &BTreeMap<QueryId, Query>,
    relevant: &RelevanceSet,
) -> BTreeMap<QueryId, Query> {
    relevant
        .query_ids()
        .filter_map(|id| queries.get(&id).map(|q| (id, q.clone())))
        .collect()
}

/// Keep only the result lists whose query has ground truth.
pub fn results_with_ground_truth(results: &ResultList, relevant: &RelevanceSet) -> ResultList {
    let mut filtered = results.clone();
    filtered.retain(|id| relevant.contains_query(id));
    filtered
}

/// Align a run's result lists with a query set.
///
/// Every query in `queries` gets a ranking, empty when the run returned
/// nothing for it, and lists for queries outside the set are dropped. An
/// empty ranking scores zero on every metric.
pub fn results_for_queries(results: &ResultList, queries: &BTreeMap<QueryId, Query>) -> ResultList {
    queries
        .keys()
        .map(|&id| (id, results.get(id).map(<[DocId]>::to_vec).unwrap_or_default()))
        .collect()
}
