//! Per-query relevance metrics.
//!
//! Every function here compares one ranked result list against the set of
//! documents judged relevant for the same query. Relevance is binary.
//!
//! Metrics implemented:
//! - **Reciprocal rank**: 1 / rank of the first relevant hit
//! - **Precision@k**: relevant hits in the top k over a named denominator
//! - **Recall@k**: relevant hits in the top k over the number of relevant documents
//! - **NDCG@k**: discounted gain of the top k over an all-relevant ideal ranking

use rankdup_core::{DocId, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How far down a result list a metric looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cutoff {
    /// The first `k` results
    Top(usize),
    /// As many results as there are relevant documents (R)
    RelevantCount,
    /// The whole result list
    Full,
}

impl Cutoff {
    /// Resolve to a concrete k for one query
    pub fn resolve(self, result_len: usize, relevant_len: usize) -> usize {
        match self {
            Self::Top(k) => k,
            Self::RelevantCount => relevant_len,
            Self::Full => result_len,
        }
    }
}

/// Denominator used by [`precision_at_k`].
///
/// The two evaluation pipelines disagree on what precision means, so the
/// caller picks one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionConvention {
    /// `hits / k`
    CutoffDenominator,
    /// `hits / |relevant|` (R-precision when paired with [`Cutoff::RelevantCount`])
    RelevantDenominator,
    /// `k' = min(k, |relevant|)`, then `hits / k'`
    ClampedCutoff,
}

/// Whether [`recall_at_k`] clamps k to the number of relevant documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallClamp {
    /// Use k as given
    None,
    /// Use `min(k, |relevant|)`
    ToRelevant,
}

/// Computes the reciprocal rank of the first relevant result.
///
/// Returns 0.0 when no result is relevant, otherwise `1 / (1 + index)` of the
/// earliest relevant document.
///
/// # Example
///
/// ```
/// use rankdup_eval::reciprocal_rank;
/// use std::collections::HashSet;
///
/// let relevant: HashSet<u64> = [9, 1].into_iter().collect();
/// assert!((reciprocal_rank(&[5, 2, 9, 1], &relevant) - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn reciprocal_rank(result: &[DocId], relevant: &HashSet<DocId>) -> f64 {
    result
        .iter()
        .position(|doc| relevant.contains(doc))
        .map_or(0.0, |index| 1.0 / (index + 1) as f64)
}

/// Computes precision over the first k results.
///
/// The numerator is the number of distinct relevant documents among the
/// first k results; the denominator depends on `convention`. A result list
/// shorter than k is not padded, its missing positions simply never hit.
///
/// # Errors
///
/// Returns [`Error::DivisionUndefined`] when the selected denominator is zero
/// (k resolves to 0, or the relevant set is empty under a convention that
/// divides by it).
pub fn precision_at_k(
    result: &[DocId],
    relevant: &HashSet<DocId>,
    cutoff: Cutoff,
    convention: PrecisionConvention,
) -> Result<f64> {
    let k = cutoff.resolve(result.len(), relevant.len());

    let (k, denominator) = match convention {
        PrecisionConvention::CutoffDenominator => (k, k),
        PrecisionConvention::RelevantDenominator => (k, relevant.len()),
        PrecisionConvention::ClampedCutoff => {
            let clamped = k.min(relevant.len());
            (clamped, clamped)
        }
    };

    if denominator == 0 {
        return Err(Error::division_undefined(format!(
            "precision with {convention:?} at {cutoff:?} over {} relevant documents",
            relevant.len()
        )));
    }

    Ok(hits_in_top(result, relevant, k) as f64 / denominator as f64)
}

/// Computes recall over the first k results: hits / |relevant|.
///
/// # Errors
///
/// Returns [`Error::DivisionUndefined`] when the relevant set is empty.
pub fn recall_at_k(
    result: &[DocId],
    relevant: &HashSet<DocId>,
    cutoff: Cutoff,
    clamp: RecallClamp,
) -> Result<f64> {
    if relevant.is_empty() {
        return Err(Error::division_undefined(
            "recall over an empty relevant set".to_string(),
        ));
    }

    let mut k = cutoff.resolve(result.len(), relevant.len());
    if clamp == RecallClamp::ToRelevant {
        k = k.min(relevant.len());
    }

    Ok(hits_in_top(result, relevant, k) as f64 / relevant.len() as f64)
}

/// Computes NDCG@k with binary gains.
///
/// # Formula
///
/// ```text
/// discount(0) = 1, discount(i) = log2(i + 1) for i >= 1
/// DCG@k  = Σ rel_i / discount(i)            for i in 0..k
/// norm@k = 1 + Σ 1 / log2(i + 1)            for i in 1..k
/// NDCG@k = DCG@k / norm@k
/// ```
///
/// The normalization assumes an ideal ranking whose first k positions are
/// all relevant, independent of how many relevant documents exist.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when k resolves to 0.
pub fn normalized_dcg(result: &[DocId], relevant: &HashSet<DocId>, cutoff: Cutoff) -> Result<f64> {
    let k = cutoff.resolve(result.len(), relevant.len());
    if k == 0 {
        return Err(Error::invalid_input(format!(
            "NDCG cutoff {cutoff:?} resolves to 0"
        )));
    }

    let dcg: f64 = result
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, doc)| relevant.contains(doc))
        .map(|(i, _)| 1.0 / discount(i))
        .sum();

    let norm: f64 = (0..k).map(|i| 1.0 / discount(i)).sum();

    Ok(dcg / norm)
}

/// Harmonic mean of precision and recall; `None` when both are zero.
pub fn f_score(precision: f64, recall: f64) -> Option<f64> {
    let sum = precision + recall;
    if sum == 0.0 {
        None
    } else {
        Some(2.0 * precision * recall / sum)
    }
}

#[inline]
fn discount(position: usize) -> f64 {
    if position == 0 {
        1.0
    } else {
        ((position + 1) as f64).log2()
    }
}

/// Distinct relevant documents among the first k results
fn hits_in_top(result: &[DocId], relevant: &HashSet<DocId>, k: usize) -> usize {
    result
        .iter()
        .take(k)
        .filter(|doc| relevant.contains(doc))
        .collect::<HashSet<_>>()
        .len()
}
