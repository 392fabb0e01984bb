//! Tunable constants for the indexer and query evaluator.
//!
//! Every constant named in the specification lives here with its documented default, so a
//! value is never hand-wired at a call site. Both configs can be loaded from a JSON file that
//! overrides defaults field-by-field; anything absent from the file keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structural-tag weights applied during HTML analysis (see `analyzer::html`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StructuralWeights {
    pub title: f64,
    pub h1: f64,
    pub h2: f64,
    pub h3: f64,
    pub b: f64,
    pub strong: f64,
    pub body: f64,
}

impl Default for StructuralWeights {
    fn default() -> Self {
        StructuralWeights {
            title: 3.0,
            h1: 2.5,
            h2: 2.0,
            h3: 1.4,
            b: 1.6,
            strong: 1.6,
            body: 1.0,
        }
    }
}

/// Tunables for the indexer build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// Number of admitted documents accumulated before a partial segment is flushed to disk.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Number of bits in the SimHash fingerprint.
    #[serde(default = "default_simhash_bits")]
    pub simhash_bits: u32,
    /// Minimum fraction of equal bit positions for two fingerprints to be "too similar".
    #[serde(default = "default_simhash_threshold")]
    pub simhash_threshold: f64,
    /// Multiplier applied to a stopword stem's occurrence weight.
    #[serde(default = "default_stopword_weight")]
    pub stopword_weight: f64,
    #[serde(default)]
    pub weights: StructuralWeights,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            batch_size: default_batch_size(),
            simhash_bits: default_simhash_bits(),
            simhash_threshold: default_simhash_threshold(),
            stopword_weight: default_stopword_weight(),
            weights: StructuralWeights::default(),
        }
    }
}

fn default_batch_size() -> usize {
    2000
}
fn default_simhash_bits() -> u32 {
    16
}
fn default_simhash_threshold() -> f64 {
    0.9
}
fn default_stopword_weight() -> f64 {
    0.5
}

/// Tunables for the query evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Document frequency above which synonym expansion is skipped for a term.
    #[serde(default = "default_high_df_threshold")]
    pub high_df_threshold: u32,
    /// Query weight applied to synonym-expanded terms (the original term always gets 1.0).
    #[serde(default = "default_synonym_weight")]
    pub synonym_weight: f64,
    /// Maximum number of synonym stems considered per original term.
    #[serde(default = "default_max_synonyms")]
    pub max_synonyms: usize,
    /// Score multiplier applied to documents that satisfy exact-phrase mode.
    #[serde(default = "default_phrase_boost")]
    pub phrase_boost: f64,
    /// Default number of results returned by `search`.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            high_df_threshold: default_high_df_threshold(),
            synonym_weight: default_synonym_weight(),
            max_synonyms: default_max_synonyms(),
            phrase_boost: default_phrase_boost(),
            top_k: default_top_k(),
        }
    }
}

fn default_high_df_threshold() -> u32 {
    1000
}
fn default_synonym_weight() -> f64 {
    0.6
}
fn default_max_synonyms() -> usize {
    3
}
fn default_phrase_boost() -> f64 {
    2.0
}
fn default_top_k() -> usize {
    10
}

impl IndexConfig {
    /// Loads config from a JSON file, falling back to defaults for any field the file omits.
    /// Absent files are not an error: the caller passes `None` or a path that may not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        load_or_default(path)
    }
}

impl QueryConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        load_or_default(path)
    }
}

fn load_or_default<T>(path: Option<&Path>) -> anyhow::Result<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    use anyhow::Context;

    match path {
        Some(p) if p.exists() => {
            let data = std::fs::read_to_string(p)
                .with_context(|| format!("reading config file {}", p.display()))?;
            let parsed = serde_json::from_str(&data)
                .with_context(|| format!("parsing config file {}", p.display()))?;
            Ok(parsed)
        }
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let idx = IndexConfig::default();
        assert_eq!(idx.batch_size, 2000);
        assert_eq!(idx.simhash_bits, 16);
        assert_eq!(idx.simhash_threshold, 0.9);
        assert_eq!(idx.stopword_weight, 0.5);
        assert_eq!(idx.weights.title, 3.0);
        assert_eq!(idx.weights.body, 1.0);

        let q = QueryConfig::default();
        assert_eq!(q.high_df_threshold, 1000);
        assert_eq!(q.synonym_weight, 0.6);
        assert_eq!(q.max_synonyms, 3);
        assert_eq!(q.phrase_boost, 2.0);
        assert_eq!(q.top_k, 10);
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index_config.json");
        std::fs::write(&path, r#"{"batch_size": 500}"#).unwrap();

        let cfg = IndexConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.batch_size, 500);
        assert_eq!(cfg.simhash_bits, 16);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let cfg = IndexConfig::load(Some(Path::new("/does/not/exist.json"))).unwrap();
        assert_eq!(cfg, IndexConfig::default());
    }
}
