//! Opens the five on-disk artifacts and serves ranked searches. The fallback cascade guards
//! against re-entering itself with an explicit `allow_fallback` flag rather than a default
//! argument.

use super::boolean::{self, QueryToken, ScoredResults};
use super::phrase;
use super::synonyms;
use crate::analyzer::tokenize;
use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::index::dictionary;
use crate::index::postings;
use crate::model::{CorpusMeta, DictionaryEntry, DocId, Posting};
use crate::stopwords::is_stopword_stem;
use ahash::AHashMap as HashMap;
use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

/// A ready-to-query index: the term dictionary, doc-id→URL map, doc-norm table, synonym table,
/// corpus size, and a single reopenable handle onto `postings.bin`.
pub struct QueryEvaluator {
    dictionary: HashMap<String, DictionaryEntry>,
    doc_ids: HashMap<DocId, String>,
    doc_norms: HashMap<DocId, f64>,
    synonyms: HashMap<String, Vec<String>>,
    n: u64,
    postings_file: RefCell<File>,
    config: QueryConfig,
}

impl QueryEvaluator {
    /// Opens all five artifacts. `index_dir` holds `dictionary.csv`, `postings.bin`,
    /// `doc_norms.json`, `corpus_meta.json`, and optionally `synonyms.json`; `doc_ids_path`
    /// points at `doc_ids.json`, which the indexer writes one level above `index_dir`. Any
    /// missing required artifact is a fatal `ArtifactMissing` error — there is no partial-open
    /// mode.
    pub fn open(
        index_dir: &Path,
        doc_ids_path: &Path,
        config: QueryConfig,
    ) -> Result<Self, QueryError> {
        let dictionary_path = index_dir.join("dictionary.csv");
        require(&dictionary_path)?;
        let dictionary = dictionary::read_dictionary(&dictionary_path)?;

        let synonyms = synonyms::load_synonyms(&index_dir.join("synonyms.json"))?;

        require(doc_ids_path)?;
        let doc_ids = read_id_keyed_map(doc_ids_path)?;

        let corpus_meta_path = index_dir.join("corpus_meta.json");
        require(&corpus_meta_path)?;
        let meta: CorpusMeta = serde_json::from_str(&std::fs::read_to_string(&corpus_meta_path)?)?;

        let doc_norms_path = index_dir.join("doc_norms.json");
        require(&doc_norms_path)?;
        let doc_norms = read_id_keyed_map(&doc_norms_path)?;

        let postings_path = index_dir.join("postings.bin");
        require(&postings_path)?;
        let postings_file = File::open(&postings_path)?;

        info!(
            terms = dictionary.len(),
            docs = meta.n,
            "opened query evaluator"
        );

        Ok(QueryEvaluator {
            dictionary,
            doc_ids,
            doc_norms,
            synonyms,
            n: meta.n,
            postings_file: RefCell::new(postings_file),
            config,
        })
    }

    /// The default `top_k` to use when a caller doesn't have an opinion.
    pub fn default_top_k(&self) -> usize {
        self.config.top_k
    }

    fn read_postings(&self, term: &str) -> Result<Vec<Posting>, QueryError> {
        let Some(entry) = self.dictionary.get(term) else {
            return Ok(Vec::new());
        };
        let mut file = self.postings_file.borrow_mut();
        file.seek(SeekFrom::Start(entry.offset))?;
        let mut block = vec![0u8; entry.length as usize];
        file.read_exact(&mut block)?;
        Ok(postings::decode_postings(term, &block)?)
    }

    fn idf(&self, df: u32) -> f64 {
        ((self.n as f64 + 1.0) / (df as f64 + 0.5)).ln() + 1.0
    }

    fn is_high_df(&self, term: &str) -> bool {
        self.dictionary
            .get(term)
            .map(|e| e.df > self.config.high_df_threshold)
            .unwrap_or(false)
    }

    /// The core ranked search: tokenize and stem, expand synonyms, accumulate TF·IDF scores,
    /// apply phrase filtering when the query is quoted, cosine-normalize, and rank. `allow_fallback`
    /// guards against the fallback cascade re-entering itself; every fallback step calls back in
    /// with it forced to `false`.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        allow_fallback: bool,
    ) -> Result<ScoredResults, QueryError> {
        let q_terms_original = dedup_preserving_order(tokenize::tokenize_and_stem(query));
        if q_terms_original.is_empty() {
            return Ok(Vec::new());
        }

        let mut expanded_terms: Vec<(String, f64)> = Vec::new();
        for t in &q_terms_original {
            expanded_terms.push((t.clone(), 1.0));
            if self.is_high_df(t) {
                debug!(term = %t, "skipping synonym expansion for high-DF term");
                continue;
            }
            for syn in synonyms::expand_synonyms(t, &self.synonyms, self.config.max_synonyms) {
                if syn != t {
                    expanded_terms.push((syn.clone(), self.config.synonym_weight));
                }
            }
        }

        let mut scores: HashMap<DocId, f64> = HashMap::default();
        let mut postings_by_term: Vec<Vec<Posting>> = Vec::with_capacity(expanded_terms.len());

        for (term, weight) in &expanded_terms {
            let Some(entry) = self.dictionary.get(term) else {
                continue;
            };
            let term_postings = self.read_postings(term)?;
            let idf = self.idf(entry.df);
            for posting in &term_postings {
                let tfw = 1.0 + (posting.tf as f64).max(1e-6).ln();
                *scores.entry(posting.doc_id).or_insert(0.0) += tfw * idf * weight;
            }
            postings_by_term.push(term_postings);
        }

        let normalized_query = query.trim().to_lowercase();
        let phrase_mode = normalized_query.len() >= 2
            && normalized_query.starts_with('"')
            && normalized_query.ends_with('"');
        if phrase_mode && expanded_terms.len() >= 2 {
            let phrase_docs = phrase::phrase_match_docs(&postings_by_term);
            scores = scores
                .into_iter()
                .filter(|(d, _)| phrase_docs.contains(d))
                .map(|(d, s)| (d, s * self.config.phrase_boost))
                .collect();
        }

        if scores.is_empty() {
            return if allow_fallback {
                self.fallback_search(&q_terms_original, top_k)
            } else {
                Ok(Vec::new())
            };
        }

        for (doc_id, score) in scores.iter_mut() {
            if let Some(norm) = self.doc_norms.get(doc_id) {
                *score /= norm;
            }
        }

        let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked.truncate(top_k);

        Ok(ranked
            .into_iter()
            .filter_map(|(d, s)| self.doc_ids.get(&d).map(|url| (url.clone(), s)))
            .collect())
    }

    /// Reruns a zero-result search with progressively weaker matching criteria, never
    /// re-entering itself.
    fn fallback_search(
        &self,
        q_terms_original: &[String],
        top_k: usize,
    ) -> Result<ScoredResults, QueryError> {
        let or_query = q_terms_original.join(" OR ");
        let results = self.search(&or_query, top_k, false)?;
        if !results.is_empty() {
            info!("fallback: switched to OR search");
            return Ok(results);
        }

        if q_terms_original.iter().all(|t| is_stopword_stem(t)) {
            debug!("fallback stopped: query contained only stopwords");
            return Ok(Vec::new());
        }

        let content_terms: Vec<String> = q_terms_original
            .iter()
            .filter(|t| !is_stopword_stem(t))
            .cloned()
            .collect();
        if !content_terms.is_empty() {
            let results = self.search(&content_terms.join(" "), top_k, false)?;
            if !results.is_empty() {
                info!("fallback: removed stopwords and retried search");
                return Ok(results);
            }
        }

        let mut syns: Vec<String> = Vec::new();
        for t in q_terms_original {
            syns.extend(
                synonyms::expand_synonyms(t, &self.synonyms, self.config.max_synonyms).cloned(),
            );
        }
        syns.retain(|s| self.dictionary.contains_key(s));
        if !syns.is_empty() {
            let results = self.search(&syns.join(" "), top_k, false)?;
            if !results.is_empty() {
                info!("fallback: synonym search");
                return Ok(results);
            }
        }

        debug!("nothing found in the corpus");
        Ok(Vec::new())
    }

    /// Evaluates a textual query through the left-to-right boolean parser. Queries with fewer
    /// than three whitespace-separated tokens dispatch straight to `search` over the whole
    /// string, since there's no room for an operator.
    pub fn eval_boolean(&self, query: &str, top_k: usize) -> Result<ScoredResults, QueryError> {
        let tokens = boolean::tokenize_boolean(query);
        if tokens.len() < 3 {
            return self.search(query, top_k, true);
        }

        let first_term = match &tokens[0] {
            QueryToken::Term(t) => t.clone(),
            _ => String::new(),
        };
        let mut result = self.search(&first_term, top_k, true)?;

        let mut i = 1;
        while i < tokens.len() - 1 {
            let op = &tokens[i];
            let right_term = match &tokens[i + 1] {
                QueryToken::Term(t) => t.clone(),
                _ => String::new(),
            };
            let right_result = self.search(&right_term, top_k, true)?;

            result = match op {
                QueryToken::And => boolean::boolean_and(&result, &right_result),
                QueryToken::Or => boolean::boolean_or(&result, &right_result, top_k),
                QueryToken::Not => boolean::boolean_not(&result, &right_result),
                QueryToken::Term(_) => result,
            };
            i += 2;
        }

        Ok(result)
    }
}

fn require(path: &Path) -> Result<(), QueryError> {
    if path.exists() {
        Ok(())
    } else {
        Err(QueryError::ArtifactMissing(path.display().to_string()))
    }
}

fn read_id_keyed_map<V: for<'de> serde::Deserialize<'de>>(
    path: &Path,
) -> Result<HashMap<DocId, V>, QueryError> {
    let raw: std::collections::HashMap<String, V> =
        serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| k.parse::<DocId>().ok().map(|id| (id, v)))
        .collect())
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index;

    fn build_test_index(dir: &Path, docs: &[(&str, &str)]) -> (std::path::PathBuf, std::path::PathBuf) {
        let index_dir = dir.join("index");
        let doc_ids_path = dir.join("doc_ids.json");
        let config = crate::config::IndexConfig::default();

        let records = docs.iter().map(|(url, html)| crate::model::DocumentRecord {
            url: url.to_string(),
            content: html.to_string(),
            encoding: "utf-8".to_string(),
        });
        index::build_index(records, &index_dir, &doc_ids_path, &config).unwrap();
        (index_dir, doc_ids_path)
    }

    #[test]
    fn exact_term_search_ranks_by_tfidf() {
        let dir = tempfile::tempdir().unwrap();
        let (index_dir, doc_ids_path) = build_test_index(
            dir.path(),
            &[
                ("http://a", "<title>Machine Learning</title><body>machine learning is powerful</body>"),
                ("http://b", "<body>cooking recipes and food</body>"),
            ],
        );

        let evaluator =
            QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default()).unwrap();
        let results = evaluator.search("machine", 10, true).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "http://a");
    }

    #[test]
    fn phrase_search_excludes_out_of_order_matches() {
        let dir = tempfile::tempdir().unwrap();
        let (index_dir, doc_ids_path) = build_test_index(
            dir.path(),
            &[
                ("http://a", "<body>machine learning is fun</body>"),
                ("http://b", "<body>learning machine tools</body>"),
            ],
        );

        let evaluator =
            QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default()).unwrap();
        let results = evaluator.search("\"machine learning\"", 10, true).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "http://a");
    }

    #[test]
    fn stopword_only_query_terminates_fallback_without_results() {
        let dir = tempfile::tempdir().unwrap();
        let (index_dir, doc_ids_path) = build_test_index(
            dir.path(),
            &[("http://a", "<title>Research Topics</title><body>computing and data</body>")],
        );

        let evaluator =
            QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default()).unwrap();
        let results = evaluator.search("to be", 10, true).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn boolean_and_requires_both_terms() {
        let dir = tempfile::tempdir().unwrap();
        let (index_dir, doc_ids_path) = build_test_index(
            dir.path(),
            &[
                ("http://a", "<body>machine learning research</body>"),
                ("http://b", "<body>machine only</body>"),
                ("http://c", "<body>learning only</body>"),
            ],
        );

        let evaluator =
            QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default()).unwrap();
        let results = evaluator.eval_boolean("machine AND learning", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "http://a");
    }

    #[test]
    fn missing_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = QueryEvaluator::open(
            &dir.path().join("index"),
            &dir.path().join("doc_ids.json"),
            QueryConfig::default(),
        );
        assert!(matches!(err, Err(QueryError::ArtifactMissing(_))));
    }
}
