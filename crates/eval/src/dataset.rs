//! Loaders for query, ground-truth and ranked-result files
//!
//! Every file is a headed TSV whose first column is a query id numbered
//! according to a [`QueryIdBase`]. Ids are normalized to zero-based on load.

use crate::aggregate::queries_with_ground_truth;
use rankdup_core::tsv::{ColumnCount, Record, RecordReader};
use rankdup_core::{
    DatasetConfig, DocId, Query, QueryId, QueryIdBase, RelevanceSet, Result, ResultList,
};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

fn query_id(record: &Record<'_>, base: QueryIdBase) -> Result<QueryId> {
    let raw: u32 = record.parse(0, "query_id")?;
    base.normalize(raw)
        .ok_or_else(|| record.malformed(format!("query id {raw} is below the {base:?} origin")))
}

/// Load `query_id, text` rows
pub fn load_queries<R: Read>(
    reader: R,
    source_name: &str,
    base: QueryIdBase,
) -> Result<BTreeMap<QueryId, Query>> {
    let mut queries = BTreeMap::new();
    let mut records = RecordReader::tsv(reader, source_name, ColumnCount::Exactly(2));

    records.for_each(|record| {
        let id = query_id(record, base)?;
        queries.insert(id, Query::new(id, record.field(1)?));
        Ok(())
    })?;

    tracing::info!("Loaded {} queries from {}", queries.len(), source_name);
    Ok(queries)
}

pub fn load_queries_file(path: &Path, base: QueryIdBase) -> Result<BTreeMap<QueryId, Query>> {
    let file = rankdup_core::tsv::open_file(path)?;
    load_queries(file, &path.display().to_string(), base)
}

/// Load `query_id, doc_id` relevance judgments
pub fn load_ground_truth<R: Read>(
    reader: R,
    source_name: &str,
    base: QueryIdBase,
) -> Result<RelevanceSet> {
    let mut relevant = RelevanceSet::new();
    let mut records = RecordReader::tsv(reader, source_name, ColumnCount::Exactly(2));

    let rows = records.for_each(|record| {
        let id = query_id(record, base)?;
        relevant.insert(id, record.parse(1, "doc_id")?);
        Ok(())
    })?;

    tracing::info!(
        "Loaded {} judgments for {} queries from {}",
        rows,
        relevant.len(),
        source_name
    );
    Ok(relevant)
}

pub fn load_ground_truth_file(path: &Path, base: QueryIdBase) -> Result<RelevanceSet> {
    let file = rankdup_core::tsv::open_file(path)?;
    load_ground_truth(file, &path.display().to_string(), base)
}

/// Load `query_id, doc_id, rank` rows; each list is ordered by rank
/// regardless of row order in the file.
pub fn load_ranked_results<R: Read>(
    reader: R,
    source_name: &str,
    base: QueryIdBase,
) -> Result<ResultList> {
    let mut ranked: BTreeMap<QueryId, Vec<(u32, DocId)>> = BTreeMap::new();
    let mut records = RecordReader::tsv(reader, source_name, ColumnCount::Exactly(3));

    records.for_each(|record| {
        let id = query_id(record, base)?;
        let doc_id: DocId = record.parse(1, "doc_id")?;
        let rank: u32 = record.parse(2, "rank")?;
        ranked.entry(id).or_default().push((rank, doc_id));
        Ok(())
    })?;

    let results: ResultList = ranked
        .into_iter()
        .map(|(id, mut hits)| {
            hits.sort_by_key(|&(rank, _)| rank);
            (id, hits.into_iter().map(|(_, doc)| doc).collect())
        })
        .collect();

    tracing::info!("Loaded results for {} queries from {}", results.len(), source_name);
    Ok(results)
}

pub fn load_ranked_results_file(path: &Path, base: QueryIdBase) -> Result<ResultList> {
    let file = rankdup_core::tsv::open_file(path)?;
    load_ranked_results(file, &path.display().to_string(), base)
}

/// A named query set with its ground truth
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    /// Only queries that have ground truth
    pub queries: BTreeMap<QueryId, Query>,
    pub ground_truth: RelevanceSet,
}

impl Dataset {
    /// Load both files of a configured dataset, dropping queries without
    /// ground truth
    pub fn load(name: &str, config: &DatasetConfig, base: QueryIdBase) -> Result<Self> {
        let all_queries = load_queries_file(&config.queries, base)?;
        let ground_truth = load_ground_truth_file(&config.ground_truth, base)?;
        let queries = queries_with_ground_truth(&all_queries, &ground_truth);

        if queries.len() < all_queries.len() {
            tracing::info!(
                "Dataset {}: {} of {} queries have ground truth",
                name,
                queries.len(),
                all_queries.len()
            );
        }

        Ok(Self {
            name: name.to_string(),
            queries,
            ground_truth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rankdup_core::Error;
    use std::io::Write;

    #[test]
    fn test_load_queries_one_based() {
        let data = "Query_ID\tQuery\n1\tflow past a cylinder\n2\tboundary layer\n";
        let queries = load_queries(data.as_bytes(), "queries.tsv", QueryIdBase::OneBased).unwrap();

        assert_eq!(
            queries.values().cloned().collect::<Vec<_>>(),
            vec![
                Query::new(0, "flow past a cylinder"),
                Query::new(1, "boundary layer")
            ]
        );
    }

    #[test]
    fn test_one_based_rejects_zero() {
        let data = "Query_ID\tQuery\n0\toops\n";
        let err = load_queries(data.as_bytes(), "queries.tsv", QueryIdBase::OneBased).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_load_ground_truth() {
        let data = "Query_id\tRelevant_Doc_id\n1\t184\n1\t29\n3\t12\n";
        let relevant =
            load_ground_truth(data.as_bytes(), "gt.tsv", QueryIdBase::ZeroBased).unwrap();

        assert_eq!(relevant.len(), 2);
        assert!(relevant.get(1).unwrap().contains(&29));
        assert!(relevant.get(3).unwrap().contains(&12));
    }

    #[test]
    fn test_ground_truth_bad_doc_id() {
        let data = "Query_id\tRelevant_Doc_id\n1\tabc\n";
        let err = load_ground_truth(data.as_bytes(), "gt.tsv", QueryIdBase::ZeroBased).unwrap_err();
        assert!(err.to_string().contains("invalid doc_id 'abc'"));
    }

    #[test]
    fn test_ranked_results_sorted_by_rank() {
        let data = "Query_ID\tDoc_ID\tRank\n0\t30\t3\n0\t10\t1\n1\t5\t1\n0\t20\t2\n";
        let results =
            load_ranked_results(data.as_bytes(), "se.tsv", QueryIdBase::ZeroBased).unwrap();

        assert_eq!(results.get(0), Some(&[10, 20, 30][..]));
        assert_eq!(results.get(1), Some(&[5][..]));
    }

    #[test]
    fn test_ranked_results_wrong_width() {
        let data = "Query_ID\tDoc_ID\tRank\n0\t30\n";
        let err =
            load_ranked_results(data.as_bytes(), "se.tsv", QueryIdBase::ZeroBased).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_dataset_load_filters_queries() {
        let dir = tempfile::tempdir().unwrap();
        let queries_path = dir.path().join("queries.tsv");
        let gt_path = dir.path().join("gt.tsv");

        let mut queries = std::fs::File::create(&queries_path).unwrap();
        writeln!(queries, "Query_ID\tQuery\n1\tfirst\n2\tsecond\n3\tthird").unwrap();
        let mut gt = std::fs::File::create(&gt_path).unwrap();
        writeln!(gt, "Query_id\tRelevant_Doc_id\n1\t10\n3\t30").unwrap();

        let config = DatasetConfig {
            queries: queries_path,
            ground_truth: gt_path,
        };
        let dataset = Dataset::load("cranfield", &config, QueryIdBase::OneBased).unwrap();

        assert_eq!(dataset.name, "cranfield");
        assert_eq!(dataset.queries.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(dataset.ground_truth.len(), 2);
    }
}
