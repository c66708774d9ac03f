//! Shingle-id and duplicate-pair TSV files

use crate::corpus::ShingleRecord;
use crate::grouping::DuplicatePair;
use crate::identifiers::{document_label, parse_document_id, DocumentShingleSet, ShingleId};
use rankdup_core::tsv::{open_file, tsv_writer, ColumnCount, Record, RecordReader};
use rankdup_core::{Error, Result};
use std::io::{Read, Write};
use std::path::Path;

/// `[1, 2, 3]`
fn format_id_list(set: &DocumentShingleSet) -> String {
    let ids: Vec<String> = set.ids().iter().map(ShingleId::to_string).collect();
    format!("[{}]", ids.join(", "))
}

fn parse_id_list(record: &Record<'_>, raw: &str) -> Result<DocumentShingleSet> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| record.malformed(format!("expected a bracketed id list, found '{raw}'")))?;

    inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<ShingleId>()
                .map_err(|e| record.malformed(format!("invalid shingle id '{token}': {e}")))
        })
        .collect::<Result<Vec<_>>>()
        .map(DocumentShingleSet::from_ids)
}

/// Write the `ID, ELEMENTS_IDS` table, skipping documents without shingles.
///
/// Returns the number of rows written.
pub fn write_shingle_sets<W: Write>(writer: W, records: &[ShingleRecord]) -> Result<u64> {
    let mut out = tsv_writer(writer);
    out.write_record(["ID", "ELEMENTS_IDS"])?;

    let mut rows = 0u64;
    for record in records.iter().filter(|r| !r.shingles.is_empty()) {
        out.write_record([document_label(record.doc_id), format_id_list(&record.shingles)])?;
        rows += 1;
    }
    out.flush()?;

    tracing::info!(
        "Wrote {} shingle sets ({} empty skipped)",
        rows,
        records.len() as u64 - rows
    );
    Ok(rows)
}

/// Read a table written by [`write_shingle_sets`]
pub fn read_shingle_sets<R: Read>(reader: R, source_name: &str) -> Result<Vec<ShingleRecord>> {
    let mut records = Vec::new();
    let mut rows = RecordReader::tsv(reader, source_name, ColumnCount::Exactly(2));

    rows.for_each(|row| {
        let label = row.field(0)?;
        let doc_id = parse_document_id(label)
            .ok_or_else(|| row.malformed(format!("invalid document id '{label}'")))?;
        records.push(ShingleRecord {
            doc_id,
            shingles: parse_id_list(row, row.field(1)?)?,
        });
        Ok(())
    })?;

    tracing::info!("Loaded {} shingle sets from {}", records.len(), source_name);
    Ok(records)
}

pub fn read_shingle_sets_file(path: &Path) -> Result<Vec<ShingleRecord>> {
    let file = open_file(path)?;
    read_shingle_sets(file, &path.display().to_string())
}

/// Write `id_set_1, id_set_2` rows, resolving pair positions to document ids
/// through `records`.
///
/// # Errors
///
/// [`Error::InvalidInput`] if a pair points past the end of `records`.
pub fn write_exact_duplicates<W: Write>(
    writer: W,
    pairs: &[DuplicatePair],
    records: &[ShingleRecord],
) -> Result<u64> {
    let label = |position: usize| {
        records
            .get(position)
            .map(|r| document_label(r.doc_id))
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "pair references document {position} of {}",
                    records.len()
                ))
            })
    };

    let mut out = tsv_writer(writer);
    out.write_record(["id_set_1", "id_set_2"])?;
    for pair in pairs {
        out.write_record([label(pair.left)?, label(pair.right)?])?;
    }
    out.flush()?;
    Ok(pairs.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(doc_id: u64, ids: &[ShingleId]) -> ShingleRecord {
        ShingleRecord {
            doc_id,
            shingles: DocumentShingleSet::from_ids(ids.to_vec()),
        }
    }

    #[test]
    fn test_shingle_sets_roundtrip_skips_empty() {
        let records = vec![record(0, &[9, 2, 4]), record(1, &[]), record(7, &[1])];

        let mut buffer = Vec::new();
        assert_eq!(write_shingle_sets(&mut buffer, &records).unwrap(), 2);

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text, "ID\tELEMENTS_IDS\nid_0\t[2, 4, 9]\nid_7\t[1]\n");

        let reloaded = read_shingle_sets(buffer.as_slice(), "memory").unwrap();
        assert_eq!(reloaded, vec![records[0].clone(), records[2].clone()]);
    }

    #[test]
    fn test_read_accepts_compact_lists() {
        let data = "ID\tELEMENTS_IDS\nid_3\t[5,1 ,3]\n";
        let records = read_shingle_sets(data.as_bytes(), "memory").unwrap();
        assert_eq!(records, vec![record(3, &[1, 3, 5])]);
    }

    #[test]
    fn test_read_rejects_unbracketed_list() {
        let data = "ID\tELEMENTS_IDS\nid_3\t5, 1\n";
        let err = read_shingle_sets(data.as_bytes(), "memory").unwrap_err();
        assert!(err.to_string().contains("bracketed"));
    }

    #[test]
    fn test_write_exact_duplicates() {
        let records = vec![record(40, &[1]), record(41, &[2]), record(42, &[1])];
        let pairs = vec![DuplicatePair::exact(0, 2)];

        let mut buffer = Vec::new();
        write_exact_duplicates(&mut buffer, &pairs, &records).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id_set_1\tid_set_2\nid_40\tid_42\n"
        );

        let out_of_range = vec![DuplicatePair::exact(0, 9)];
        assert!(write_exact_duplicates(Vec::new(), &out_of_range, &records).is_err());
    }
}
