//! Shingle-based duplicate detection
//!
//! Documents are normalized, cut into overlapping token shingles and mapped
//! to sets of dense shingle ids. Identical sets are exact duplicates; Jaccard
//! similarity between sets scores near duplicates.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod corpus;
pub mod grouping;
pub mod identifiers;
pub mod io;
pub mod overlap;
pub mod shingle;

pub use corpus::{build_shingle_sets, load_documents, load_documents_file, Document, ShingleRecord};
pub use grouping::{
    count_pairs, find_exact_duplicate_groups, groups_to_pairs, DuplicateGroup, DuplicateGroups,
    DuplicatePair,
};
pub use identifiers::{
    assign_ids, document_label, jaccard, parse_document_id, shingles_as_ids, DocumentShingleSet,
    ShingleId, ShingleVocabulary,
};
pub use io::{read_shingle_sets, read_shingle_sets_file, write_exact_duplicates, write_shingle_sets};
pub use overlap::{
    evaluate_detection, find_near_duplicates, load_similarity_table, write_similarity_table,
    DetectionReport, SimilarityTable,
};
pub use shingle::{preprocess, shingle, PreprocessOptions, Shingle, MIN_SHINGLE_TOKENS};
