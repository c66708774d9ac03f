//! `shingles`, `exact-duplicates`, `near-duplicates` and `detection` pipelines

use anyhow::{Context, Result};
use rankdup_core::tsv::{create_file, open_file};
use rankdup_core::{CorpusConfig, ShinglingConfig};
use rankdup_dedup::{
    build_shingle_sets, count_pairs, evaluate_detection, find_exact_duplicate_groups,
    find_near_duplicates, groups_to_pairs, load_documents_file, load_similarity_table,
    read_shingle_sets_file, write_exact_duplicates, write_shingle_sets, write_similarity_table,
    DetectionReport, SimilarityTable,
};
use std::path::Path;
use tracing::info;

/// Shingle a corpus and write its shingle-id table; returns rows written
pub fn build_shingle_file(
    input: &Path,
    output: &Path,
    corpus: &CorpusConfig,
    shingling: &ShinglingConfig,
) -> Result<u64> {
    info!("Reading documents from {}", input.display());
    let documents = load_documents_file(input, corpus)
        .with_context(|| format!("Failed to load corpus {}", input.display()))?;

    let (vocabulary, records) = build_shingle_sets(&documents, shingling)?;
    info!(
        "Writing {} documents over {} shingles to {}",
        records.len(),
        vocabulary.len(),
        output.display()
    );

    let rows = write_shingle_sets(create_file(output)?, &records)?;
    Ok(rows)
}

/// Exact-duplicate pair count, optionally writing the pairs
pub fn exact_duplicates(input: &Path, output: Option<&Path>) -> Result<u64> {
    let records = read_shingle_sets_file(input)
        .with_context(|| format!("Failed to load shingle sets {}", input.display()))?;

    let groups = find_exact_duplicate_groups(records.iter().map(|r| &r.shingles));
    let pairs = count_pairs(&groups);

    if let Some(output) = output {
        info!("Saving duplicates to {}", output.display());
        write_exact_duplicates(create_file(output)?, &groups_to_pairs(&groups), &records)?;
    }

    Ok(pairs)
}

/// Brute-force near-duplicate table; returns the number of pairs written
pub fn near_duplicates(input: &Path, threshold: f64, output: &Path) -> Result<u64> {
    let records = read_shingle_sets_file(input)
        .with_context(|| format!("Failed to load shingle sets {}", input.display()))?;

    let table = find_near_duplicates(&records, threshold);
    let rows = write_similarity_table(create_file(output)?, &table)?;
    Ok(rows)
}

/// Score predicted near duplicates against a ground-truth table
pub fn detection(ground_truth: &Path, predicted: &Path) -> Result<DetectionReport> {
    let report = evaluate_detection(
        &load_table(ground_truth)?,
        &load_table(predicted)?,
    )?;
    Ok(report)
}

fn load_table(path: &Path) -> Result<SimilarityTable> {
    let file = open_file(path)?;
    load_similarity_table(file, &path.display().to_string())
        .with_context(|| format!("Failed to load similarity table {}", path.display()))
}
