//! The precomputed synonym table: `stem → ordered list of synonym stems`, produced out-of-band
//! and consumed read-only. Absent entirely, it degrades to a no-op.

use crate::error::QueryError;
use ahash::AHashMap as HashMap;
use std::path::Path;

/// Loads `synonyms.json`. A missing file is not an error: the evaluator runs with an empty
/// table, which makes synonym expansion a no-op everywhere it is consulted.
pub fn load_synonyms(path: &Path) -> Result<HashMap<String, Vec<String>>, QueryError> {
    if !path.exists() {
        return Ok(HashMap::default());
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Up to `max` synonym stems for `term`, in table order. Never includes `term` itself — callers
/// filter that out, matching the source's own dedup-on-insert behavior.
pub fn expand_synonyms<'a>(
    term: &str,
    table: &'a HashMap<String, Vec<String>>,
    max: usize,
) -> impl Iterator<Item = &'a String> {
    table
        .get(term)
        .into_iter()
        .flat_map(move |syns| syns.iter().take(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_table() {
        let table = load_synonyms(Path::new("/does/not/exist.json")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn round_trips_a_written_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"{"machin": ["devic", "engin", "tool", "extra"]}"#).unwrap();

        let table = load_synonyms(&path).unwrap();
        let expanded: Vec<&String> = expand_synonyms("machin", &table, 3).collect();
        assert_eq!(expanded, vec!["devic", "engin", "tool"]);
    }
}
