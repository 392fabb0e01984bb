//! Tokenization and stemming shared by the analyzer and the query evaluator.
//!
//! A term is a nonempty lowercase ASCII-alphanumeric string that has been Porter-stemmed.
//! Tokenization and stemming are kept here, independent of any HTML handling, so the query
//! evaluator can run the exact same path over a raw query string.

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::sync::Mutex;

/// Matches one run of ASCII letters/digits; applied to already-lowercased text.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").unwrap());

/// Returns the process-lifetime Porter stemmer instance.
pub fn get_stemmer() -> &'static Stemmer {
    static STEMMER: OnceCell<Stemmer> = OnceCell::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Memoizes stem results by raw (lowercased) token, since the same token recurs constantly
/// within and across documents.
static STEM_CACHE: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Stems a single already-lowercased alphanumeric token, using the shared cache.
pub fn stem_cached(token: &str) -> String {
    if let Some(hit) = STEM_CACHE.lock().unwrap().get(token) {
        return hit.clone();
    }
    let stemmed = get_stemmer().stem(token).into_owned();
    STEM_CACHE
        .lock()
        .unwrap()
        .insert(token.to_string(), stemmed.clone());
    stemmed
}

/// Splits `text` into lowercase alphanumeric runs, per the `[A-Za-z0-9]+` rule.
pub fn tokenize_raw(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokenizes and stems `text`, in order, without deduplication.
pub fn tokenize_and_stem(text: &str) -> Vec<String> {
    tokenize_raw(text).iter().map(|t| stem_cached(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphanumeric() {
        let tokens = tokenize_raw("Hello, World! foo_bar 123");
        assert_eq!(tokens, vec!["hello", "world", "foo", "bar", "123"]);
    }

    #[test]
    fn lowercases_before_matching() {
        let tokens = tokenize_raw("ALPHA Beta");
        assert_eq!(tokens, vec!["alpha", "beta"]);
    }

    #[test]
    fn stemming_is_cached_and_consistent() {
        let a = stem_cached("running");
        let b = stem_cached("running");
        assert_eq!(a, b);
        assert_eq!(a, "run");
    }
}
