//! The on-disk inverted index: partial-index flush, external merge, and final artifact
//! writing.

pub mod builder;
pub mod dictionary;
pub mod merge;
pub mod postings;
pub mod writer;

use crate::analyzer::{self, AnalyzerOutput};
use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::model::DocumentRecord;
use crate::simhash::DuplicateFilter;
use builder::PartialIndexBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Summary returned once a build has fully run the
/// `Init → Scanning → … → FinalFlush → Merging → WritingArtifacts → Done` state machine.
pub struct BuildSummary {
    pub processed_docs: usize,
    pub admitted_docs: usize,
    pub duplicate_rejections: usize,
    pub unique_terms: usize,
    pub artifact_sizes: writer::ArtifactSizes,
}

/// Drives one full indexer build over `records`, writing final artifacts under `index_dir`
/// (for `postings.bin`, `dictionary.csv`, `doc_norms.json`, `corpus_meta.json`) and
/// `doc_ids_path` (for `doc_ids.json`, which lives one level above `index_dir`).
pub fn build_index(
    records: impl IntoIterator<Item = DocumentRecord>,
    index_dir: &Path,
    doc_ids_path: &Path,
    config: &IndexConfig,
) -> Result<BuildSummary, IndexError> {
    std::fs::create_dir_all(index_dir)?;
    let mut builder = PartialIndexBuilder::new(index_dir, config.batch_size);
    let mut dup_filter = DuplicateFilter::new(config.simhash_bits, config.simhash_threshold);

    let mut processed_docs = 0usize;
    let mut duplicate_rejections = 0usize;

    for record in records {
        processed_docs += 1;

        if record.content.trim().is_empty() {
            debug!(url = %record.url, "skipping empty payload");
            continue;
        }

        let output: AnalyzerOutput = analyzer::analyze(&record.content, config);
        if output.is_empty() {
            debug!(url = %record.url, "skipping non-HTML or degenerate payload");
            continue;
        }

        if !dup_filter.admit(output.simhash) {
            duplicate_rejections += 1;
            debug!(url = %record.url, "rejected as near-duplicate");
            continue;
        }

        builder.admit(&record.url, &output)?;
    }

    let finished = builder.finish()?;
    let merged = merge::merge_segments(&finished.segment_paths)?;
    let unique_terms = merged.len();

    let artifact_sizes = writer::write_artifacts(
        index_dir,
        doc_ids_path,
        &merged,
        &finished.doc_ids,
        finished.n_admitted,
    )?;

    info!(
        processed_docs,
        admitted_docs = finished.n_admitted,
        duplicate_rejections,
        unique_terms,
        "build complete"
    );

    Ok(BuildSummary {
        processed_docs,
        admitted_docs: finished.n_admitted,
        duplicate_rejections,
        unique_terms,
        artifact_sizes,
    })
}
