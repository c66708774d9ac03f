//! Raw document corpus loading and whole-corpus shingling

use crate::identifiers::{assign_ids, shingles_as_ids, DocumentShingleSet, ShingleVocabulary};
use crate::shingle::{preprocess, shingle, PreprocessOptions, Shingle};
use indicatif::{ProgressBar, ProgressStyle};
use rankdup_core::tsv::{open_file, ColumnCount, RecordReader};
use rankdup_core::{CorpusConfig, DocId, Result, ShinglingConfig};
use std::io::Read;
use std::path::Path;

/// A document from the corpus file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

/// A document's id paired with its shingle-id set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShingleRecord {
    pub doc_id: DocId,
    pub shingles: DocumentShingleSet,
}

/// Load documents from a delimited corpus laid out as described by `layout`
pub fn load_documents<R: Read>(
    reader: R,
    source_name: &str,
    layout: &CorpusConfig,
) -> Result<Vec<Document>> {
    let min_columns = layout.id_column.max(layout.text_column) + 1;
    let mut records = RecordReader::with_delimiter(
        reader,
        layout.delimiter_byte()?,
        layout.has_headers,
        source_name,
        ColumnCount::AtLeast(min_columns),
    );

    let mut documents = Vec::new();
    records.for_each(|record| {
        documents.push(Document {
            id: record.parse(layout.id_column, "document id")?,
            text: record.field(layout.text_column)?.to_string(),
        });
        Ok(())
    })?;

    tracing::info!("Loaded {} documents from {}", documents.len(), source_name);
    Ok(documents)
}

pub fn load_documents_file(path: &Path, layout: &CorpusConfig) -> Result<Vec<Document>> {
    let file = open_file(path)?;
    load_documents(file, &path.display().to_string(), layout)
}

/// Shingle every document and map the shingles to corpus-wide ids.
///
/// Documents that produce no shingles keep an empty set; writers decide
/// whether to drop them.
pub fn build_shingle_sets(
    documents: &[Document],
    config: &ShinglingConfig,
) -> Result<(ShingleVocabulary, Vec<ShingleRecord>)> {
    let options = PreprocessOptions::from(config);

    let pb = create_progress_bar(documents.len());
    pb.set_message("Shingling documents");
    let per_document: Vec<Vec<Shingle>> = documents
        .iter()
        .map(|doc| {
            pb.inc(1);
            shingle(&preprocess(&doc.text, options), config.length, config.keep_short)
        })
        .collect();
    pb.finish_with_message("Shingling complete");

    let vocabulary = assign_ids(per_document.iter().flatten())?;
    tracing::info!(
        "Assigned ids to {} distinct shingles across {} documents",
        vocabulary.len(),
        documents.len()
    );

    let records = documents
        .iter()
        .zip(&per_document)
        .map(|(doc, shingles)| {
            Ok(ShingleRecord {
                doc_id: doc.id,
                shingles: shingles_as_ids(&vocabulary, shingles)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((vocabulary, records))
}

pub(crate) fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| tracing::error!("Failed to set progress bar style: {}", e))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}
