//! Error types for the indexing and query subsystems.

/// Errors that can occur while building, merging, or writing the index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed postings block for term {term:?}: {reason}")]
    MalformedPostings { term: String, reason: String },
}

/// Errors that can occur while opening or serving the query evaluator.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required artifact missing: {0}")]
    ArtifactMissing(String),

    #[error("postings error: {0}")]
    Postings(#[from] IndexError),
}
