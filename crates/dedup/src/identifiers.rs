//! Dense integer ids for shingles and per-document id sets

use crate::shingle::Shingle;
use rankdup_core::{DocId, Error, Result};
use std::collections::HashMap;

/// Identifier of a distinct shingle within one vocabulary
pub type ShingleId = u32;

/// Bijective shingle -> id map built over a whole corpus
#[derive(Debug, Clone, Default)]
pub struct ShingleVocabulary {
    ids: HashMap<Shingle, ShingleId>,
}

impl ShingleVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `shingle`, assigning the next free id if it is new
    pub fn intern(&mut self, shingle: &Shingle) -> Result<ShingleId> {
        if let Some(&id) = self.ids.get(shingle) {
            return Ok(id);
        }
        let id = ShingleId::try_from(self.ids.len()).map_err(|_| {
            Error::invalid_input(format!(
                "vocabulary exceeds {} distinct shingles",
                ShingleId::MAX
            ))
        })?;
        self.ids.insert(shingle.clone(), id);
        Ok(id)
    }

    pub fn get(&self, shingle: &Shingle) -> Option<ShingleId> {
        self.ids.get(shingle).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Assign ids to every distinct shingle, in first-seen order starting at 0
pub fn assign_ids<'a, I>(shingles: I) -> Result<ShingleVocabulary>
where
    I: IntoIterator<Item = &'a Shingle>,
{
    let mut vocabulary = ShingleVocabulary::new();
    for shingle in shingles {
        vocabulary.intern(shingle)?;
    }
    tracing::debug!("Built vocabulary of {} shingles", vocabulary.len());
    Ok(vocabulary)
}

/// Sorted, duplicate-free shingle ids of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentShingleSet(Vec<ShingleId>);

impl DocumentShingleSet {
    /// Build from ids in any order, dropping repeats
    pub fn from_ids(mut ids: Vec<ShingleId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn ids(&self) -> &[ShingleId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size of the intersection with `other`, by merging the two sorted lists
    pub fn intersection_len(&self, other: &Self) -> usize {
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }
}

impl FromIterator<ShingleId> for DocumentShingleSet {
    fn from_iter<T: IntoIterator<Item = ShingleId>>(iter: T) -> Self {
        Self::from_ids(iter.into_iter().collect())
    }
}

/// Map a document's shingles to their ids.
///
/// # Errors
///
/// [`Error::MissingKey`] if a shingle was never added to `vocabulary`.
pub fn shingles_as_ids(
    vocabulary: &ShingleVocabulary,
    doc_shingles: &[Shingle],
) -> Result<DocumentShingleSet> {
    doc_shingles
        .iter()
        .map(|shingle| {
            vocabulary
                .get(shingle)
                .ok_or_else(|| Error::missing_key(format!("shingle {shingle} has no id")))
        })
        .collect::<Result<Vec<_>>>()
        .map(DocumentShingleSet::from_ids)
}

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`; two empty sets score 0
pub fn jaccard(a: &DocumentShingleSet, b: &DocumentShingleSet) -> f64 {
    let shared = a.intersection_len(b);
    let union = a.len() + b.len() - shared;
    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}

/// Parse a document label written as `id_42` or `42`
pub fn parse_document_id(label: &str) -> Option<DocId> {
    let label = label.trim();
    label.strip_prefix("id_").unwrap_or(label).parse().ok()
}

/// Label written for a document in shingle and duplicate files
pub fn document_label(id: DocId) -> String {
    format!("id_{id}")
}
