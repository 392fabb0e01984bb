//! Binary codec for `postings.bin`: a term's postings are a contiguous run with no headers or
//! separators; boundaries are known only via the dictionary's `(offset, length)`.

use crate::error::IndexError;
use crate::model::Posting;

/// Byte length of one posting's fixed prefix (`doc_id` + `tf` + `pos_count`).
const POSTING_PREFIX_LEN: usize = 4 + 4 + 4;

/// Encodes one term's postings list into its contiguous on-disk byte run.
pub fn encode_postings(postings: &[Posting]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(postings.iter().map(encoded_len).sum());
    for posting in postings {
        buf.extend_from_slice(&posting.doc_id.to_le_bytes());
        buf.extend_from_slice(&posting.tf.to_le_bytes());
        buf.extend_from_slice(&(posting.positions.len() as i32).to_le_bytes());
        for pos in &posting.positions {
            buf.extend_from_slice(&pos.to_le_bytes());
        }
    }
    buf
}

/// Byte length a single posting will occupy once encoded: `8 + 4 + 4*pos_count`.
pub fn encoded_len(posting: &Posting) -> usize {
    POSTING_PREFIX_LEN + posting.positions.len() * 4
}

/// Decodes a contiguous byte block — exactly the bytes written by `encode_postings` for one
/// term — back into its postings list. Terminates after consuming the whole block; any
/// trailing bytes beyond a well-formed sequence of postings is a format error.
pub fn decode_postings(term: &str, block: &[u8]) -> Result<Vec<Posting>, IndexError> {
    let mut postings = Vec::new();
    let mut cursor = 0usize;

    while cursor < block.len() {
        if block.len() - cursor < POSTING_PREFIX_LEN {
            return Err(IndexError::MalformedPostings {
                term: term.to_string(),
                reason: "truncated posting prefix".to_string(),
            });
        }

        let doc_id = i32::from_le_bytes(block[cursor..cursor + 4].try_into().unwrap());
        cursor += 4;
        let tf = f32::from_le_bytes(block[cursor..cursor + 4].try_into().unwrap());
        cursor += 4;
        let pos_count = i32::from_le_bytes(block[cursor..cursor + 4].try_into().unwrap());
        cursor += 4;

        if pos_count < 0 {
            return Err(IndexError::MalformedPostings {
                term: term.to_string(),
                reason: format!("negative position count {pos_count}"),
            });
        }
        let pos_count = pos_count as usize;
        let needed = pos_count * 4;
        if block.len() - cursor < needed {
            return Err(IndexError::MalformedPostings {
                term: term.to_string(),
                reason: "truncated position list".to_string(),
            });
        }

        let mut positions = Vec::with_capacity(pos_count);
        for _ in 0..pos_count {
            positions.push(i32::from_le_bytes(block[cursor..cursor + 4].try_into().unwrap()));
            cursor += 4;
        }

        postings.push(Posting {
            doc_id,
            tf,
            positions,
        });
    }

    Ok(postings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_postings() -> Vec<Posting> {
        vec![
            Posting {
                doc_id: 0,
                tf: 4.0,
                positions: vec![0, 1],
            },
            Posting {
                doc_id: 3,
                tf: 1.5,
                positions: vec![7],
            },
        ]
    }

    #[test]
    fn round_trips_a_hand_built_block() {
        let postings = sample_postings();
        let encoded = encode_postings(&postings);
        let decoded = decode_postings("alpha", &encoded).unwrap();
        assert_eq!(decoded, postings);
    }

    #[test]
    fn length_matches_sum_of_posting_sizes() {
        let postings = sample_postings();
        let encoded = encode_postings(&postings);
        let expected: usize = postings.iter().map(encoded_len).sum();
        assert_eq!(encoded.len(), expected);
    }

    #[test]
    fn rejects_truncated_block() {
        let postings = sample_postings();
        let mut encoded = encode_postings(&postings);
        encoded.truncate(encoded.len() - 1);
        assert!(decode_postings("alpha", &encoded).is_err());
    }

    proptest! {
        #[test]
        fn arbitrary_posting_lists_round_trip(
            entries in prop::collection::vec(
                (any::<i32>(), any::<f32>(), prop::collection::vec(any::<i32>(), 0..8)),
                0..16,
            )
        ) {
            let postings: Vec<Posting> = entries
                .into_iter()
                .map(|(doc_id, tf, positions)| Posting { doc_id, tf, positions })
                .collect();
            let encoded = encode_postings(&postings);
            let decoded = decode_postings("t", &encoded).unwrap();
            prop_assert_eq!(decoded, postings);
        }
    }
}
