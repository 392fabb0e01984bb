//! In-memory partial index accumulation and batch flush.
//!
//! Doc-id/posting accumulation with a configurable batch size and an on-disk flush format.

use crate::analyzer::AnalyzerOutput;
use crate::error::IndexError;
use crate::model::{DocId, Posting};
use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct PartialSegment {
    postings: HashMap<String, Vec<Posting>>,
}

/// Accumulates in-memory postings across admitted documents, flushing self-contained partial
/// segments to `out_dir` once `batch_size` documents have been processed since the last flush.
pub struct PartialIndexBuilder {
    out_dir: PathBuf,
    batch_size: usize,
    in_memory: HashMap<String, Vec<Posting>>,
    pub doc_ids: HashMap<DocId, String>,
    next_doc_id: DocId,
    processed_since_flush: usize,
    batch_number: usize,
    pub segment_paths: Vec<PathBuf>,
}

impl PartialIndexBuilder {
    pub fn new(out_dir: impl Into<PathBuf>, batch_size: usize) -> Self {
        PartialIndexBuilder {
            out_dir: out_dir.into(),
            batch_size,
            in_memory: HashMap::default(),
            doc_ids: HashMap::default(),
            next_doc_id: 0,
            processed_since_flush: 0,
            batch_number: 0,
            segment_paths: Vec::new(),
        }
    }

    /// Assigns the document a doc id, records its URL, and folds its analyzer output into the
    /// in-memory postings map (positions only; per-occurrence weights are discarded once the
    /// accumulated `tf` has been read). Flushes a partial segment if this document completes a
    /// batch.
    pub fn admit(&mut self, url: &str, output: &AnalyzerOutput) -> Result<DocId, IndexError> {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;
        self.doc_ids.insert(doc_id, url.to_string());

        for (stem, tf) in &output.tf {
            let positions: Vec<i32> = output.positions[stem].iter().map(|(p, _)| *p as i32).collect();
            self.in_memory
                .entry(stem.clone())
                .or_default()
                .push(Posting {
                    doc_id,
                    tf: *tf as f32,
                    positions,
                });
        }

        self.processed_since_flush += 1;
        if self.processed_since_flush % self.batch_size == 0 {
            self.flush()?;
        }

        Ok(doc_id)
    }

    /// Serializes the current in-memory map to a partial segment file and clears it. Safe to
    /// call with an empty map (writes an empty segment, harmless to the merger).
    pub fn flush(&mut self) -> Result<(), IndexError> {
        let path = self.out_dir.join(format!("partial-{:06}.json", self.batch_number));
        let segment = PartialSegment {
            postings: std::mem::take(&mut self.in_memory),
        };
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer(file, &segment)?;

        info!(
            batch = self.batch_number,
            terms = segment.postings.len(),
            path = %path.display(),
            "flushed partial segment"
        );

        self.segment_paths.push(path);
        self.batch_number += 1;
        Ok(())
    }

    /// Flushes any remaining in-memory postings, regardless of whether a full batch has
    /// accumulated: a final partial flush always occurs at end-of-input.
    pub fn finish(mut self) -> Result<FinishedBuild, IndexError> {
        if !self.in_memory.is_empty() || self.segment_paths.is_empty() {
            self.flush()?;
        }
        Ok(FinishedBuild {
            segment_paths: self.segment_paths,
            doc_ids: self.doc_ids,
            n_admitted: self.next_doc_id as usize,
        })
    }
}

/// What a completed build hands off to the merger and writer.
pub struct FinishedBuild {
    pub segment_paths: Vec<PathBuf>,
    pub doc_ids: HashMap<DocId, String>,
    pub n_admitted: usize,
}

pub(crate) fn read_segment(path: &Path) -> Result<HashMap<String, Vec<Posting>>, IndexError> {
    let file = std::fs::File::open(path)?;
    let segment: PartialSegment = serde_json::from_reader(file)?;
    Ok(segment.postings)
}
