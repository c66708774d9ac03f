//! Data model shared by the evaluation and duplicate-detection pipelines

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Query identifier, normalized to zero-based on load
pub type QueryId = u32;

/// Document identifier as stored by the search index and the corpus files
pub type DocId = u64;

/// Numbering convention of query ids in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIdBase {
    /// Ids are stored as-is
    ZeroBased,
    /// Ids start at 1 and are shifted down by one on load
    OneBased,
}

impl QueryIdBase {
    /// Convert a raw id read from a file into a zero-based [`QueryId`]
    pub fn normalize(self, raw: u32) -> Option<QueryId> {
        match self {
            Self::ZeroBased => Some(raw),
            Self::OneBased => raw.checked_sub(1),
        }
    }
}

/// A single query loaded from a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: QueryId,
    pub text: String,
}

impl Query {
    pub fn new(id: QueryId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Ground truth: for every query, the set of relevant document ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceSet {
    judgments: BTreeMap<QueryId, HashSet<DocId>>,
}

impl RelevanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `doc_id` as relevant for `query_id`
    pub fn insert(&mut self, query_id: QueryId, doc_id: DocId) {
        self.judgments.entry(query_id).or_default().insert(doc_id);
    }

    /// Relevant documents for a query, if the query has any ground truth
    pub fn get(&self, query_id: QueryId) -> Option<&HashSet<DocId>> {
        self.judgments.get(&query_id)
    }

    pub fn contains_query(&self, query_id: QueryId) -> bool {
        self.judgments.contains_key(&query_id)
    }

    pub fn query_ids(&self) -> impl Iterator<Item = QueryId> + '_ {
        self.judgments.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryId, &HashSet<DocId>)> {
        self.judgments.iter().map(|(id, docs)| (*id, docs))
    }

    /// Number of queries with ground truth
    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }
}

impl FromIterator<(QueryId, DocId)> for RelevanceSet {
    fn from_iter<T: IntoIterator<Item = (QueryId, DocId)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (query_id, doc_id) in iter {
            set.insert(query_id, doc_id);
        }
        set
    }
}

/// Ranked document ids per query; position 0 is the top-ranked hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultList {
    rankings: BTreeMap<QueryId, Vec<DocId>>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the ranking for a query, replacing any previous one
    pub fn insert(&mut self, query_id: QueryId, ranking: Vec<DocId>) {
        self.rankings.insert(query_id, ranking);
    }

    pub fn get(&self, query_id: QueryId) -> Option<&[DocId]> {
        self.rankings.get(&query_id).map(Vec::as_slice)
    }

    pub fn query_ids(&self) -> impl Iterator<Item = QueryId> + '_ {
        self.rankings.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryId, &[DocId])> {
        self.rankings.iter().map(|(id, docs)| (*id, docs.as_slice()))
    }

    /// Keep only queries for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(QueryId) -> bool) {
        self.rankings.retain(|id, _| keep(*id));
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}

impl FromIterator<(QueryId, Vec<DocId>)> for ResultList {
    fn from_iter<T: IntoIterator<Item = (QueryId, Vec<DocId>)>>(iter: T) -> Self {
        Self {
            rankings: iter.into_iter().collect(),
        }
    }
}
