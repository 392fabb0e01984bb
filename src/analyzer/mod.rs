//! Converts one HTML payload into a weighted term-frequency map, per-term position lists, and
//! a near-duplicate fingerprint.

pub mod html;
pub mod tokenize;

use crate::config::IndexConfig;
use crate::simhash::weighted_simhash;
use crate::stopwords::is_stopword_stem;
use ahash::AHashMap as HashMap;

/// The kind of payload a document record carries, decided once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Html,
    NonHtml,
}

/// Classifies a payload without materializing an analyzer output, used by the indexer to
/// decide whether a document even reaches the duplicate filter.
pub fn classify(content: &str) -> PayloadKind {
    if content.trim().is_empty() || html::looks_like_non_html(content) {
        PayloadKind::NonHtml
    } else {
        PayloadKind::Html
    }
}

/// The analyzer's output for one document. Empty (all maps empty, fingerprint all-zero) for
/// non-HTML or empty payloads; the indexer is responsible for skipping those documents rather
/// than inspecting this struct for emptiness itself.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOutput {
    pub tf: HashMap<String, f64>,
    pub positions: HashMap<String, Vec<(u32, f64)>>,
    pub simhash: u32,
}

impl AnalyzerOutput {
    pub fn is_empty(&self) -> bool {
        self.tf.is_empty()
    }
}

/// Runs the full pipeline over one HTML payload: tag removal, structural-weighted
/// tokenization, stemming, stopword demotion, position assignment, and SimHash fingerprinting.
///
/// Returns an empty output for non-HTML content rather than erroring.
pub fn analyze(content: &str, config: &IndexConfig) -> AnalyzerOutput {
    if classify(content) != PayloadKind::Html {
        return AnalyzerOutput::default();
    }

    let blocks = html::extract_weighted_blocks(content, &config.weights);

    let mut tf: HashMap<String, f64> = HashMap::new();
    let mut positions: HashMap<String, Vec<(u32, f64)>> = HashMap::new();
    let mut raw_freq: HashMap<String, f64> = HashMap::new();
    let mut position_counter: u32 = 0;

    for block in &blocks {
        for raw_token in tokenize::tokenize_raw(&block.text) {
            *raw_freq.entry(raw_token.clone()).or_insert(0.0) += 1.0;

            let stem = tokenize::stem_cached(&raw_token);
            let mut weight = block.weight;
            if is_stopword_stem(&stem) {
                weight *= config.stopword_weight;
            }

            *tf.entry(stem.clone()).or_insert(0.0) += weight;
            positions
                .entry(stem)
                .or_default()
                .push((position_counter, weight));

            position_counter += 1;
        }
    }

    if tf.is_empty() {
        return AnalyzerOutput::default();
    }

    let simhash = weighted_simhash(&raw_freq, config.simhash_bits);

    AnalyzerOutput {
        tf,
        positions,
        simhash,
    }
}
