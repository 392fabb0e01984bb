//! Deterministically enumerates document-record files under a root directory and decodes them.
//! Gitignore and hidden-file handling are disabled: this corpus is data, not a source tree.

use crate::model::DocumentRecord;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Walks `root` in deterministic, lexicographically-sorted order, then decodes the resulting
/// files in parallel: decoding is embarrassingly parallel, but doc-id assignment, which happens
/// downstream in the builder, stays sequential and ordered by this function's output.
pub fn walk_records(root: &Path) -> Vec<DocumentRecord> {
    let paths = collect_file_paths(root);
    paths
        .par_iter()
        .filter_map(|path| decode_record(path))
        .collect()
}

fn collect_file_paths(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    walker
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "directory walk entry failed");
                    return None;
                }
            };
            if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                Some(entry.into_path())
            } else {
                None
            }
        })
        .collect()
}

fn decode_record(path: &Path) -> Option<DocumentRecord> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable document record, skipping");
            return None;
        }
    };

    match serde_json::from_str::<DocumentRecord>(&data) {
        Ok(record) if record.content.trim().is_empty() => {
            warn!(path = %path.display(), "empty content, skipping");
            None
        }
        Ok(record) => Some(record),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "malformed document record, skipping");
            None
        }
    }
}
