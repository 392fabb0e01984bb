//! `dictionary.csv` read/write: `term, df, offset, length` rows.

use crate::error::IndexError;
use crate::model::DictionaryEntry;
use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct DictionaryRow {
    term: String,
    df: u32,
    offset: u64,
    length: u64,
}

/// Writes the dictionary, one row per term, in the iteration order given (the writer is
/// expected to pass terms in lexicographic order; this function does not re-sort).
pub fn write_dictionary(
    path: &Path,
    entries: &[(String, DictionaryEntry)],
) -> Result<(), IndexError> {
    let mut writer = csv::Writer::from_path(path)?;
    for (term, entry) in entries {
        writer.serialize(DictionaryRow {
            term: term.clone(),
            df: entry.df,
            offset: entry.offset,
            length: entry.length,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the dictionary into a lookup map.
pub fn read_dictionary(path: &Path) -> Result<HashMap<String, DictionaryEntry>, IndexError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut map = HashMap::default();
    for row in reader.deserialize() {
        let row: DictionaryRow = row?;
        map.insert(
            row.term,
            DictionaryEntry {
                df: row.df,
                offset: row.offset,
                length: row.length,
            },
        );
    }
    Ok(map)
}
