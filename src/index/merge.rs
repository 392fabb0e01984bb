//! Streams partial segments into one logical index.
//!
//! Each doc_id appears in exactly one partial segment (insertion order across partials is
//! contiguous doc-id ranges), so merging is a concatenate-then-sort per term, never a combine.

use crate::error::IndexError;
use crate::index::builder::read_segment;
use crate::model::Posting;
use ahash::AHashMap as HashMap;
use std::path::Path;
use tracing::info;

/// Reads every partial segment in ascending order and returns the unified `term → postings`
/// map, each postings list sorted by doc_id ascending. Deletes the consumed segment files once
/// the merge has succeeded.
pub fn merge_segments(segment_paths: &[impl AsRef<Path>]) -> Result<HashMap<String, Vec<Posting>>, IndexError> {
    let mut merged: HashMap<String, Vec<Posting>> = HashMap::default();

    for path in segment_paths {
        let segment = read_segment(path.as_ref())?;
        for (term, mut postings) in segment {
            merged.entry(term).or_default().append(&mut postings);
        }
    }

    for postings in merged.values_mut() {
        postings.sort_by_key(|p| p.doc_id);
    }

    info!(
        segments = segment_paths.len(),
        terms = merged.len(),
        "merged partial segments"
    );

    for path in segment_paths {
        let _ = std::fs::remove_file(path.as_ref());
    }

    Ok(merged)
}
