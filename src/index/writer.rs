//! Emits the final durable index artifacts, in a fixed order: postings, then the dictionary
//! that points into them, then doc norms and corpus metadata.

use crate::error::IndexError;
use crate::index::dictionary::write_dictionary;
use crate::index::postings::{encode_postings, encoded_len};
use crate::model::{CorpusMeta, DictionaryEntry, DocId, Posting};
use ahash::AHashMap as HashMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Byte sizes of the artifacts just written, for the CLI's summary line.
pub struct ArtifactSizes {
    pub postings_bin: u64,
    pub dictionary_csv: u64,
    pub doc_ids_json: u64,
    pub doc_norms_json: u64,
    pub corpus_meta_json: u64,
}

impl ArtifactSizes {
    pub fn total(&self) -> u64 {
        self.postings_bin
            + self.dictionary_csv
            + self.doc_ids_json
            + self.doc_norms_json
            + self.corpus_meta_json
    }
}

/// Writes `postings.bin`, `dictionary.csv`, `doc_ids.json`, `doc_norms.json`, and
/// `corpus_meta.json`, in that order, rooted at `doc_ids_path` (for `doc_ids.json`, which lives
/// one level above the rest) and `index_dir` (for everything else).
pub fn write_artifacts(
    index_dir: &Path,
    doc_ids_path: &Path,
    merged: &HashMap<String, Vec<Posting>>,
    doc_ids: &HashMap<DocId, String>,
    n_admitted: usize,
) -> Result<ArtifactSizes, IndexError> {
    std::fs::create_dir_all(index_dir)?;

    let mut terms: Vec<&String> = merged.keys().collect();
    terms.sort();

    let postings_bin_path = index_dir.join("postings.bin");
    let mut postings_file = std::fs::File::create(&postings_bin_path)?;

    let mut dictionary_entries = Vec::with_capacity(terms.len());
    let mut offset: u64 = 0;
    for term in &terms {
        let postings = &merged[*term];
        let encoded = encode_postings(postings);
        postings_file.write_all(&encoded)?;

        let length: u64 = postings.iter().map(|p| encoded_len(p) as u64).sum();
        dictionary_entries.push((
            (*term).clone(),
            DictionaryEntry {
                df: postings.len() as u32,
                offset,
                length,
            },
        ));
        offset += length;
    }
    postings_file.flush()?;

    let dictionary_csv_path = index_dir.join("dictionary.csv");
    write_dictionary(&dictionary_csv_path, &dictionary_entries)?;

    let doc_ids_json_path = doc_ids_path.to_path_buf();
    let doc_ids_map: std::collections::BTreeMap<String, &String> = doc_ids
        .iter()
        .map(|(id, url)| (id.to_string(), url))
        .collect();
    let doc_ids_file = std::fs::File::create(&doc_ids_json_path)?;
    serde_json::to_writer_pretty(doc_ids_file, &doc_ids_map)?;

    let doc_norms = compute_doc_norms(merged);
    let doc_norms_json_path = index_dir.join("doc_norms.json");
    let doc_norms_map: std::collections::BTreeMap<String, f64> = doc_norms
        .iter()
        .map(|(id, norm)| (id.to_string(), *norm))
        .collect();
    let doc_norms_file = std::fs::File::create(&doc_norms_json_path)?;
    serde_json::to_writer_pretty(doc_norms_file, &doc_norms_map)?;

    let corpus_meta_json_path = index_dir.join("corpus_meta.json");
    let meta = CorpusMeta {
        n: n_admitted as u64,
    };
    let corpus_meta_file = std::fs::File::create(&corpus_meta_json_path)?;
    serde_json::to_writer_pretty(corpus_meta_file, &meta)?;

    let sizes = ArtifactSizes {
        postings_bin: std::fs::metadata(&postings_bin_path)?.len(),
        dictionary_csv: std::fs::metadata(&dictionary_csv_path)?.len(),
        doc_ids_json: std::fs::metadata(&doc_ids_json_path)?.len(),
        doc_norms_json: std::fs::metadata(&doc_norms_json_path)?.len(),
        corpus_meta_json: std::fs::metadata(&corpus_meta_json_path)?.len(),
    };

    info!(
        terms = terms.len(),
        docs = n_admitted,
        total_bytes = sizes.total(),
        "wrote index artifacts"
    );

    Ok(sizes)
}

/// `norm[d] = sqrt( Σ_t (1 + log(max(tf[t,d], ε)))^2 )`, ε = 1e-6, computed by iterating every
/// posting exactly once.
fn compute_doc_norms(merged: &HashMap<String, Vec<Posting>>) -> HashMap<DocId, f64> {
    const EPSILON: f64 = 1e-6;
    let mut sums: HashMap<DocId, f64> = HashMap::default();

    for postings in merged.values() {
        for posting in postings {
            let log_weighted = 1.0 + (posting.tf as f64).max(EPSILON).ln();
            *sums.entry(posting.doc_id).or_insert(0.0) += log_weighted * log_weighted;
        }
    }

    sums.into_iter().map(|(id, sum)| (id, sum.sqrt())).collect()
}
