use anyhow::Result;
use tempfile::TempDir;
use webdex::config::{IndexConfig, QueryConfig};
use webdex::index;
use webdex::model::DocumentRecord;
use webdex::query::QueryEvaluator;

fn record(url: &str, content: &str) -> DocumentRecord {
    DocumentRecord {
        url: url.to_string(),
        content: content.to_string(),
        encoding: "utf-8".to_string(),
    }
}

#[test]
fn full_build_and_query_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let index_dir = dir.path().join("index");
    let doc_ids_path = dir.path().join("doc_ids.json");
    let index_config = IndexConfig::default();

    let records = vec![
        record(
            "http://a",
            "<title>Machine Learning</title><body>machine learning is fun and useful</body>",
        ),
        record(
            "http://b",
            "<body>learning machine tools for cooking and recipes</body>",
        ),
        record("http://c", "<title>Totally Unrelated</title><body>gardening tips</body>"),
    ];

    let summary = index::build_index(records, &index_dir, &doc_ids_path, &index_config)?;
    assert_eq!(summary.processed_docs, 3);
    assert_eq!(summary.admitted_docs, 3);
    assert!(summary.unique_terms > 0);
    assert!(summary.artifact_sizes.total() > 0);

    for artifact in ["dictionary.csv", "postings.bin", "doc_norms.json", "corpus_meta.json"] {
        assert!(index_dir.join(artifact).exists(), "missing {artifact}");
    }
    assert!(doc_ids_path.exists());

    let evaluator = QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default())?;

    let free_text = evaluator.search("machine learning", 10, true)?;
    assert!(!free_text.is_empty());
    assert!(free_text.iter().any(|(url, _)| url == "http://a"));

    let phrase = evaluator.search("\"machine learning\"", 10, true)?;
    assert_eq!(phrase.len(), 1);
    assert_eq!(phrase[0].0, "http://a");

    Ok(())
}

#[test]
fn near_duplicate_document_is_rejected_and_not_indexed() -> Result<()> {
    let dir = TempDir::new()?;
    let index_dir = dir.path().join("index");
    let doc_ids_path = dir.path().join("doc_ids.json");
    let index_config = IndexConfig::default();

    let html = "<title>Research Overview</title><body>this corpus discusses research topics at length to pad content</body>";
    let records = vec![record("http://first", html), record("http://second", html)];

    let summary = index::build_index(records, &index_dir, &doc_ids_path, &index_config)?;
    assert_eq!(summary.admitted_docs, 1);
    assert_eq!(summary.duplicate_rejections, 1);

    let doc_ids: std::collections::HashMap<String, String> =
        serde_json::from_str(&std::fs::read_to_string(&doc_ids_path)?)?;
    assert_eq!(doc_ids.len(), 1);

    Ok(())
}

#[test]
fn empty_and_non_html_records_leave_no_trace() -> Result<()> {
    let dir = TempDir::new()?;
    let index_dir = dir.path().join("index");
    let doc_ids_path = dir.path().join("doc_ids.json");
    let index_config = IndexConfig::default();

    let records = vec![
        record("http://empty", ""),
        record("http://ics", "BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR"),
        record("http://real", "<title>Real Page</title><body>some actual content here</body>"),
    ];

    let summary = index::build_index(records, &index_dir, &doc_ids_path, &index_config)?;
    assert_eq!(summary.admitted_docs, 1);

    let doc_ids: std::collections::HashMap<String, String> =
        serde_json::from_str(&std::fs::read_to_string(&doc_ids_path)?)?;
    assert!(doc_ids.values().any(|u| u == "http://real"));
    assert!(!doc_ids.values().any(|u| u == "http://empty" || u == "http://ics"));

    Ok(())
}

#[test]
fn fallback_cascade_terminates_on_stopword_only_query() -> Result<()> {
    let dir = TempDir::new()?;
    let index_dir = dir.path().join("index");
    let doc_ids_path = dir.path().join("doc_ids.json");
    let index_config = IndexConfig::default();

    let records = vec![record(
        "http://a",
        "<title>Research Areas</title><body>computing and applied mathematics</body>",
    )];
    index::build_index(records, &index_dir, &doc_ids_path, &index_config)?;

    let evaluator = QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default())?;

    // "to be" stems to two stopwords; primary search and every fallback step must come up
    // empty without recursing back into the fallback cascade.
    let results = evaluator.search("to be", 10, true)?;
    assert!(results.is_empty());

    Ok(())
}

#[test]
fn boolean_and_then_not_composes_left_to_right() -> Result<()> {
    let dir = TempDir::new()?;
    let index_dir = dir.path().join("index");
    let doc_ids_path = dir.path().join("doc_ids.json");
    let index_config = IndexConfig::default();

    let records = vec![
        record("http://both", "<body>machine learning research program</body>"),
        record("http://machine-only", "<body>machine shop equipment</body>"),
        record("http://learning-only", "<body>learning a new language</body>"),
        record("http://excluded", "<body>machine learning research excluded case</body>"),
    ];
    index::build_index(records, &index_dir, &doc_ids_path, &index_config)?;

    let evaluator = QueryEvaluator::open(&index_dir, &doc_ids_path, QueryConfig::default())?;

    let results = evaluator.eval_boolean("machine AND learning NOT excluded", 10)?;
    let urls: Vec<&str> = results.iter().map(|(u, _)| u.as_str()).collect();
    assert!(urls.contains(&"http://both"));
    assert!(!urls.contains(&"http://excluded"));

    Ok(())
}
