//! Exact multi-term phrase matching via positional intersection.
//!
//! For each candidate document holding every term, a phrase hit requires a starting position in
//! the first term's posting such that position `start + i` appears in the i-th term's posting,
//! for every `i`.

use crate::model::{DocId, Posting};
use ahash::{AHashMap as HashMap, AHashSet as HashSet};

/// Doc ids where the terms occur, in order, at consecutive positions. Requires at least two
/// postings lists; returns an empty set for a single-term "phrase" (there is nothing to anchor
/// the second term against).
pub fn phrase_match_docs(postings_by_term: &[Vec<Posting>]) -> HashSet<DocId> {
    if postings_by_term.len() < 2 {
        return HashSet::default();
    }

    let position_maps: Vec<HashMap<DocId, HashSet<i32>>> = postings_by_term
        .iter()
        .map(|postings| {
            postings
                .iter()
                .map(|p| (p.doc_id, p.positions.iter().copied().collect()))
                .collect()
        })
        .collect();

    let mut common: HashSet<DocId> = position_maps[0].keys().copied().collect();
    for map in &position_maps[1..] {
        common.retain(|doc| map.contains_key(doc));
    }

    let mut matches = HashSet::default();
    for doc in common {
        let first_positions = &position_maps[0][&doc];
        let found = first_positions.iter().any(|&start| {
            (1..position_maps.len()).all(|i| position_maps[i][&doc].contains(&(start + i as i32)))
        });
        if found {
            matches.insert(doc);
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(doc_id: DocId, positions: &[i32]) -> Posting {
        Posting {
            doc_id,
            tf: positions.len() as f32,
            positions: positions.to_vec(),
        }
    }

    #[test]
    fn single_term_list_yields_no_matches() {
        let postings = vec![vec![posting(0, &[0, 1])]];
        assert!(phrase_match_docs(&postings).is_empty());
    }

    #[test]
    fn adjacent_occurrence_in_the_same_doc_matches() {
        // doc1: "machine learning is fun" -> machine@0, learning@1
        // doc2: "learning machine tools" -> machine@1, learning@0 (not adjacent in that order)
        let machine = vec![posting(1, &[0]), posting(2, &[1])];
        let learning = vec![posting(1, &[1]), posting(2, &[0])];

        let matches = phrase_match_docs(&[machine, learning]);
        assert!(matches.contains(&1));
        assert!(!matches.contains(&2));
    }

    #[test]
    fn three_term_phrase_requires_all_consecutive() {
        let a = vec![posting(0, &[5])];
        let b = vec![posting(0, &[6])];
        let c = vec![posting(0, &[8])]; // should be 7 to match, not 8
        assert!(phrase_match_docs(&[a, b, c]).is_empty());
    }
}
