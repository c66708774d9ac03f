//! Near-duplicate similarity tables and detection scoring
//!
//! A [`SimilarityTable`] stores each scored pair once, in whichever direction
//! it was produced. Lookups that compare two tables always check both
//! directions.

use crate::corpus::{create_progress_bar, ShingleRecord};
use crate::identifiers::{document_label, jaccard, parse_document_id};
use rankdup_core::tsv::{tsv_writer, ColumnCount, RecordReader};
use rankdup_core::{DocId, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Nested `id_1 -> id_2 -> jaccard` map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityTable {
    scores: BTreeMap<DocId, BTreeMap<DocId, f64>>,
}

impl SimilarityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id_1: DocId, id_2: DocId, similarity: f64) {
        self.scores.entry(id_1).or_default().insert(id_2, similarity);
    }

    /// Score stored for exactly `(id_1, id_2)`
    pub fn get(&self, id_1: DocId, id_2: DocId) -> Option<f64> {
        self.scores.get(&id_1)?.get(&id_2).copied()
    }

    /// Whether the pair is stored in either direction; unknown ids are absent
    pub fn contains_either(&self, id_1: DocId, id_2: DocId) -> bool {
        self.get(id_1, id_2).is_some() || self.get(id_2, id_1).is_some()
    }

    /// Every stored pair as `(id_1, id_2, similarity)`
    pub fn pairs(&self) -> impl Iterator<Item = (DocId, DocId, f64)> + '_ {
        self.scores
            .iter()
            .flat_map(|(&a, inner)| inner.iter().map(move |(&b, &s)| (a, b, s)))
    }

    /// Number of stored pairs
    pub fn len(&self) -> usize {
        self.scores.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a five-column `jaccard, id_1, name_1, id_2, name_2` TSV.
///
/// The name columns are ignored. Ids may be written as `id_42` or `42`.
pub fn load_similarity_table<R: Read>(reader: R, source_name: &str) -> Result<SimilarityTable> {
    let mut table = SimilarityTable::new();
    let mut records = RecordReader::tsv(reader, source_name, ColumnCount::Exactly(5));

    records.for_each(|record| {
        let similarity: f64 = record.parse(0, "jaccard")?;
        let id = |index: usize| {
            let raw = record.field(index)?;
            parse_document_id(raw)
                .ok_or_else(|| record.malformed(format!("invalid document id '{raw}'")))
        };
        table.insert(id(1)?, id(3)?, similarity);
        Ok(())
    })?;

    tracing::info!("Loaded {} scored pairs from {}", table.len(), source_name);
    Ok(table)
}

/// Write `table` in the format read by [`load_similarity_table`].
///
/// The name columns are left empty.
pub fn write_similarity_table<W: Write>(writer: W, table: &SimilarityTable) -> Result<u64> {
    let mut out = tsv_writer(writer);
    out.write_record(["jaccard", "id_1", "name_1", "id_2", "name_2"])?;

    let mut rows = 0u64;
    for (a, b, similarity) in table.pairs() {
        out.write_record([
            similarity.to_string(),
            document_label(a),
            String::new(),
            document_label(b),
            String::new(),
        ])?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

/// Outcome of comparing predicted near duplicates with the ground truth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Ground-truth pairs found among the predictions, over all ground-truth pairs
    pub detection_probability: f64,
    /// Predicted pairs absent from the ground truth
    pub false_positives: u64,
    /// Ground-truth pairs absent from the predictions
    pub false_negatives: u64,
}

/// Score `predicted` against `ground_truth`, matching pairs in either direction.
///
/// # Errors
///
/// [`Error::DivisionUndefined`] if the ground truth holds no pairs.
pub fn evaluate_detection(
    ground_truth: &SimilarityTable,
    predicted: &SimilarityTable,
) -> Result<DetectionReport> {
    let total = ground_truth.len();
    if total == 0 {
        return Err(Error::division_undefined(
            "detection probability over an empty ground truth".to_string(),
        ));
    }

    let mut detected = 0u64;
    let mut false_negatives = 0u64;
    for (a, b, _) in ground_truth.pairs() {
        if predicted.contains_either(a, b) {
            detected += 1;
        } else {
            false_negatives += 1;
        }
    }

    let false_positives = predicted
        .pairs()
        .filter(|&(a, b, _)| !ground_truth.contains_either(a, b))
        .count() as u64;

    Ok(DetectionReport {
        detection_probability: detected as f64 / total as f64,
        false_positives,
        false_negatives,
    })
}

/// Score every pair of documents and keep those at or above `threshold`.
///
/// Quadratic in the number of documents; meant to produce the reference
/// table that approximate detectors are evaluated against. Empty sets are
/// skipped.
pub fn find_near_duplicates(records: &[ShingleRecord], threshold: f64) -> SimilarityTable {
    let mut table = SimilarityTable::new();
    let candidates: Vec<&ShingleRecord> =
        records.iter().filter(|r| !r.shingles.is_empty()).collect();

    let pb = create_progress_bar(candidates.len());
    pb.set_message("Comparing shingle sets");
    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            let similarity = jaccard(&a.shingles, &b.shingles);
            if similarity >= threshold {
                table.insert(a.doc_id, b.doc_id, similarity);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Comparison complete");

    tracing::info!(
        "Found {} pairs with similarity >= {} among {} documents",
        table.len(),
        threshold,
        candidates.len()
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::DocumentShingleSet;
    use pretty_assertions::assert_eq;

    fn table(pairs: &[(DocId, DocId, f64)]) -> SimilarityTable {
        let mut table = SimilarityTable::new();
        for &(a, b, s) in pairs {
            table.insert(a, b, s);
        }
        table
    }

    #[test]
    fn test_detection_is_direction_agnostic() {
        let report =
            evaluate_detection(&table(&[(1, 2, 0.9)]), &table(&[(2, 1, 0.8)])).unwrap();

        assert_eq!(
            report,
            DetectionReport {
                detection_probability: 1.0,
                false_positives: 0,
                false_negatives: 0,
            }
        );
    }

    #[test]
    fn test_detection_counts_misses_and_unknown_ids() {
        let ground_truth = table(&[(1, 2, 0.9), (3, 4, 0.85)]);
        // (7, 8) mentions ids the ground truth has never seen
        let predicted = table(&[(1, 2, 0.9), (7, 8, 0.95), (1, 3, 0.81)]);

        let report = evaluate_detection(&ground_truth, &predicted).unwrap();
        assert_eq!(report.detection_probability, 0.5);
        assert_eq!(report.false_negatives, 1);
        assert_eq!(report.false_positives, 2);
    }

    #[test]
    fn test_detection_empty_ground_truth() {
        let err = evaluate_detection(&SimilarityTable::new(), &table(&[(1, 2, 1.0)])).unwrap_err();
        assert!(matches!(err, Error::DivisionUndefined(_)));
    }

    #[test]
    fn test_load_similarity_table() {
        let data = "jaccard\tid_1\tname_1\tid_2\tname_2\n\
                    0.9\tid_1\tego\tid_2\tego remix\n\
                    0.82\t5\t\t9\t\n";
        let table = load_similarity_table(data.as_bytes(), "gt.tsv").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, 2), Some(0.9));
        assert_eq!(table.get(2, 1), None);
        assert!(table.contains_either(9, 5));
    }

    #[test]
    fn test_load_similarity_table_rejects_four_columns() {
        let data = "jaccard\tid_1\tid_2\tname\n0.9\t1\t2\tx\n";
        assert!(matches!(
            load_similarity_table(data.as_bytes(), "gt.tsv").unwrap_err(),
            Error::MalformedRecord { line: 2, .. }
        ));
    }

    #[test]
    fn test_similarity_table_file_roundtrip() {
        let original = table(&[(1, 2, 0.9), (1, 5, 0.8), (3, 4, 1.0)]);

        let mut buffer = Vec::new();
        assert_eq!(write_similarity_table(&mut buffer, &original).unwrap(), 3);
        let reloaded = load_similarity_table(buffer.as_slice(), "memory").unwrap();

        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_find_near_duplicates() {
        let record = |doc_id, ids: &[u32]| ShingleRecord {
            doc_id,
            shingles: DocumentShingleSet::from_ids(ids.to_vec()),
        };
        let records = vec![
            record(10, &[1, 2, 3, 4, 5]),
            record(11, &[1, 2, 3, 4, 6]),
            record(12, &[1, 2, 3, 4, 5]),
            record(13, &[]),
            record(14, &[7, 8]),
        ];

        let table = find_near_duplicates(&records, 0.6);
        // 10-11: 4/6, 10-12: 1.0, 11-12: 4/6
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(10, 12), Some(1.0));
        assert!(table.contains_either(11, 12));
        assert!(!table.contains_either(10, 14));
    }
}
