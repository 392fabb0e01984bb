//! Core data types shared across the indexer and the query evaluator.

use serde::{Deserialize, Serialize};

/// A document id: a monotonically assigned, non-negative integer unique within one build.
/// Not stable across rebuilds.
pub type DocId = i32;

/// One input record as read from a corpus file: a URL, a raw payload, and an advisory
/// encoding hint. The encoding hint is not interpreted; payloads are always decoded as UTF-8.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// A posting as stored in the partial index and, eventually, in `postings.bin`: the
/// document, its accumulated term frequency weight, and the strictly increasing list of
/// positions at which the term occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: f32,
    pub positions: Vec<i32>,
}

/// A dictionary row: how many documents contain a term, and where its postings live in
/// `postings.bin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub df: u32,
    pub offset: u64,
    pub length: u64,
}

/// `corpus_meta.json`'s single field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CorpusMeta {
    #[serde(rename = "N")]
    pub n: u64,
}
