//! Seam to the external full-text search engine
//!
//! Indexing and query execution live outside this crate. An implementation
//! of [`SearchIndex`] opens a prebuilt index; its [`SearchSession`] parses
//! query text against one field and returns stored documents best-first.

use crate::scoring::ScoringKind;
use rankdup_core::{DocId, Error, Query, QueryId, Result, ResultList};
use std::collections::BTreeMap;
use std::path::Path;

/// A hit returned by the search engine, carrying the stored document id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A prebuilt, read-only index
pub trait SearchIndex: Sized {
    type Session<'a>: SearchSession
    where
        Self: 'a;

    /// Open the index stored at `path`
    fn open(path: &Path) -> Result<Self>;

    /// Start a searching session using `weighting`
    fn searcher(&self, weighting: &ScoringKind) -> Result<Self::Session<'_>>;
}

/// One searching session over an open index
pub trait SearchSession {
    type ParsedQuery;

    fn parse(&self, field: &str, text: &str) -> Result<Self::ParsedQuery>;

    /// Execute a parsed query, returning every hit best-first
    fn search(&self, query: &Self::ParsedQuery) -> Result<Vec<StoredDocument>>;
}

/// Run every query against `index` and collect ranked document ids.
///
/// Stored ids must be unsigned integers; anything else fails with
/// [`Error::MalformedRecord`] pointing at the 1-based rank of the hit.
pub fn collect_result_lists<I: SearchIndex>(
    index: &I,
    weighting: &ScoringKind,
    field: &str,
    queries: &BTreeMap<QueryId, Query>,
) -> Result<ResultList> {
    let session = index.searcher(weighting)?;
    let mut results = ResultList::new();

    for (&query_id, query) in queries {
        let parsed = session.parse(field, &query.text)?;
        let hits = session.search(&parsed)?;

        let ranking = hits
            .iter()
            .enumerate()
            .map(|(rank, hit)| {
                hit.id.trim().parse::<DocId>().map_err(|_| {
                    Error::malformed(
                        "search index",
                        rank as u64 + 1,
                        format!("query {query_id}: stored id '{}' is not an integer", hit.id),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!("Query {} returned {} hits", query_id, ranking.len());
        results.insert(query_id, ranking);
    }

    tracing::debug!(
        "Collected {} result lists with {}",
        results.len(),
        weighting
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Index keyed by exact query text
    struct FixedIndex {
        answers: HashMap<String, Vec<&'static str>>,
    }

    struct FixedSession<'a> {
        index: &'a FixedIndex,
    }

    impl SearchIndex for FixedIndex {
        type Session<'a> = FixedSession<'a>;

        fn open(_path: &Path) -> Result<Self> {
            Ok(Self {
                answers: HashMap::new(),
            })
        }

        fn searcher(&self, _weighting: &ScoringKind) -> Result<Self::Session<'_>> {
            Ok(FixedSession { index: self })
        }
    }

    impl SearchSession for FixedSession<'_> {
        type ParsedQuery = String;

        fn parse(&self, _field: &str, text: &str) -> Result<String> {
            Ok(text.to_lowercase())
        }

        fn search(&self, query: &String) -> Result<Vec<StoredDocument>> {
            Ok(self
                .index
                .answers
                .get(query)
                .map(|ids| ids.iter().map(|id| StoredDocument::new(*id)).collect())
                .unwrap_or_default())
        }
    }

    fn queries() -> BTreeMap<QueryId, Query> {
        BTreeMap::from([(1, Query::new(1, "Wings")), (2, Query::new(2, "nothing"))])
    }

    #[test]
    fn test_collect_result_lists() {
        let index = FixedIndex {
            answers: HashMap::from([("wings".to_string(), vec!["12", " 7", "3"])]),
        };

        let results =
            collect_result_lists(&index, &ScoringKind::TfIdf, "content", &queries()).unwrap();

        assert_eq!(results.get(1), Some(&[12, 7, 3][..]));
        // queries without hits still get an (empty) list
        assert_eq!(results.get(2), Some(&[][..]));
    }

    #[test]
    fn test_non_integer_stored_id() {
        let index = FixedIndex {
            answers: HashMap::from([("wings".to_string(), vec!["12", "doc-7"])]),
        };

        let err = collect_result_lists(&index, &ScoringKind::Frequency, "content", &queries())
            .unwrap_err();

        match err {
            Error::MalformedRecord { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("doc-7"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
