//! The stemmed English stopword set.
//!
//! Stopword status is a property of the *stem*, not the raw token: the raw word list below is
//! Porter-stemmed once, lazily, into a process-lifetime singleton.

use crate::analyzer::tokenize::get_stemmer;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Standard English stopwords, pre-stemming. Lifted verbatim from a general-purpose English
/// stopword list (see DESIGN.md).
const RAW_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does", "doesn't",
    "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had", "hadn't",
    "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "let's",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some",
    "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then",
    "there", "there's", "these", "they", "they'd", "they'll", "they're", "they've", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we",
    "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's",
    "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
    "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

/// The stemmed stopword set, computed once. `[A-Za-z0-9]+` tokenization means a contraction
/// like `"don't"` is only ever observed by the tokenizer as `"don"` and `"t"`, but we stem the
/// raw list as-is (apostrophes and all) so any caller stemming the same raw words sees
/// consistent membership; stems of the already-alnum fragments (`don`, `t`, `isn`, `s`, ...)
/// end up in the set too once stemmed, which is what actually matters for demotion.
pub static STOPWORD_STEMS: Lazy<HashSet<String>> = Lazy::new(|| {
    let stemmer = get_stemmer();
    RAW_STOPWORDS
        .iter()
        .flat_map(|w| w.split(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(|w| stemmer.stem(&w.to_lowercase()).into_owned())
        .collect()
});

/// Returns true if `stem` is a demoted stopword stem.
pub fn is_stopword_stem(stem: &str) -> bool {
    STOPWORD_STEMS.contains(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_stopwords_are_demoted() {
        assert!(is_stopword_stem("the"));
        assert!(is_stopword_stem("is"));
        assert!(is_stopword_stem("and"));
    }

    #[test]
    fn content_words_are_not_stopwords() {
        assert!(!is_stopword_stem("machin")); // stem of "machine"
        assert!(!is_stopword_stem("learn")); // stem of "learning"
    }
}
