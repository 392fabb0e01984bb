//! Boolean composition over scored result lists and the left-to-right textual query parser.
//! No operator precedence: tokens are consumed strictly left to right.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};

/// A ranked result list as returned by `QueryEvaluator::search`: `(url, score)` pairs, not
/// necessarily sorted by the caller's convention until a boolean combinator runs.
pub type ScoredResults = Vec<(String, f64)>;

/// Intersects by URL; the combined score is the sum of both sides' scores.
pub fn boolean_and(left: &ScoredResults, right: &ScoredResults) -> ScoredResults {
    let right_map: HashMap<&str, f64> = right.iter().map(|(u, s)| (u.as_str(), *s)).collect();
    left.iter()
        .filter_map(|(u, s)| right_map.get(u.as_str()).map(|rs| (u.clone(), s + rs)))
        .collect()
}

/// Unions by URL, keeping the maximum score per URL, then truncates to `top_k`.
pub fn boolean_or(left: &ScoredResults, right: &ScoredResults, top_k: usize) -> ScoredResults {
    let mut combined: HashMap<String, f64> = HashMap::default();
    for (url, score) in left.iter().chain(right.iter()) {
        let entry = combined.entry(url.clone()).or_insert(0.0);
        if *score > *entry {
            *entry = *score;
        }
    }

    let mut results: ScoredResults = combined.into_iter().collect();
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);
    results
}

/// Left minus right by URL; scores are carried from the left side unchanged.
pub fn boolean_not(left: &ScoredResults, right: &ScoredResults) -> ScoredResults {
    let right_urls: HashSet<&str> = right.iter().map(|(u, _)| u.as_str()).collect();
    left.iter()
        .filter(|(u, _)| !right_urls.contains(u.as_str()))
        .cloned()
        .collect()
}

/// One token of a textual boolean query, classified case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Term(String),
    And,
    Or,
    Not,
}

/// Splits `query` on whitespace and classifies each token, lowercasing terms and normalizing
/// operator keywords. No quoting or precedence is honored here — phrase mode is detected
/// separately on the whole query string before this parser ever runs.
pub fn tokenize_boolean(query: &str) -> Vec<QueryToken> {
    query
        .split_whitespace()
        .map(|tok| match tok.to_uppercase().as_str() {
            "AND" => QueryToken::And,
            "OR" => QueryToken::Or,
            "NOT" => QueryToken::Not,
            _ => QueryToken::Term(tok.to_lowercase()),
        })
        .collect()
}
