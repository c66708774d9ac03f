//! Exact-duplicate detection over document shingle sets

use crate::identifiers::DocumentShingleSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use twox_hash::XxHash3_128;

/// A pair of duplicate documents, `left < right`.
///
/// `similarity` is `None` for exact duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub left: usize,
    pub right: usize,
    pub similarity: Option<f64>,
}

impl DuplicatePair {
    /// Exact-duplicate pair with its ends ordered
    pub fn exact(a: usize, b: usize) -> Self {
        Self {
            left: a.min(b),
            right: a.max(b),
            similarity: None,
        }
    }
}

/// Documents sharing one shingle set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// XxHash3-128 of the sorted id sequence. Only meaningful within the run
    /// that produced it; never persist or compare across runs.
    pub key: u128,
    /// Document positions, ascending
    pub members: Vec<usize>,
}

impl DuplicateGroup {
    /// Number of unordered pairs in this group
    pub fn pair_count(&self) -> u64 {
        let n = self.members.len() as u64;
        n * n.saturating_sub(1) / 2
    }
}

/// All groups found in one pass, in order of first member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
}

impl DuplicateGroups {
    /// Every group, singletons included
    pub fn iter(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter()
    }

    /// Groups with at least two members
    pub fn duplicates(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.members.len() > 1)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn content_hash(set: &DocumentShingleSet) -> u128 {
    let bytes: Vec<u8> = set.ids().iter().flat_map(|id| id.to_le_bytes()).collect();
    XxHash3_128::oneshot(&bytes)
}

/// Group documents whose shingle sets are identical.
///
/// Documents are identified by their position in `sets`. Grouping compares
/// the sets themselves, so a hash collision can never merge two different
/// sets. Documents with an empty set are never grouped.
pub fn find_exact_duplicate_groups<'a, I>(sets: I) -> DuplicateGroups
where
    I: IntoIterator<Item = &'a DocumentShingleSet>,
{
    let mut index: HashMap<&DocumentShingleSet, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (position, set) in sets.into_iter().enumerate() {
        if set.is_empty() {
            continue;
        }
        match index.get(set) {
            Some(&group) => groups[group].members.push(position),
            None => {
                index.insert(set, groups.len());
                groups.push(DuplicateGroup {
                    key: content_hash(set),
                    members: vec![position],
                });
            }
        }
    }

    let groups = DuplicateGroups { groups };
    tracing::info!(
        "Found {} distinct shingle sets, {} shared by more than one document",
        groups.len(),
        groups.duplicates().count()
    );
    groups
}

/// Total number of duplicate pairs, `Σ n(n-1)/2` over the groups
pub fn count_pairs(groups: &DuplicateGroups) -> u64 {
    groups.iter().map(DuplicateGroup::pair_count).sum()
}

/// Every `i < j` pair within each group; singletons contribute nothing
pub fn groups_to_pairs(groups: &DuplicateGroups) -> Vec<DuplicatePair> {
    groups
        .duplicates()
        .flat_map(|group| {
            group.members.iter().enumerate().flat_map(move |(i, &a)| {
                group.members[i + 1..]
                    .iter()
                    .map(move |&b| DuplicatePair::exact(a, b))
            })
        })
        .collect()
}
