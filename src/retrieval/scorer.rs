//! tf-idf relevance scoring.
//!
//! score(query, chunk) = Σ over distinct query terms of
//! tf(term, chunk) × idf(term), with idf cached in the store at load time.
//! The per-request work here is pairing the query's distinct terms with
//! their cached weights once, so scoring a chunk is O(distinct terms).

use std::collections::HashSet;

use super::normalize::NormalizedQuery;
use super::store::{Chunk, ChunkStore};

/// A distinct query term paired with its corpus idf weight.
#[derive(Debug, Clone)]
pub struct TermWeight {
    term: String,
    idf: f64,
}

/// Pair the query's distinct terms with their cached idf weights.
///
/// Terms no served chunk contains get no entry: their tf is zero in every
/// chunk, so dropping them leaves every score unchanged. Query-term
/// multiplicity does not add entries — the score sums over distinct terms.
pub fn query_weights(query: &NormalizedQuery, store: &ChunkStore) -> Vec<TermWeight> {
    let mut seen = HashSet::new();
    query
        .terms()
        .iter()
        .filter(|term| seen.insert(term.as_str()))
        .filter_map(|term| {
            store.idf(term).map(|idf| TermWeight {
                term: term.clone(),
                idf,
            })
        })
        .collect()
}

/// Score one chunk against precomputed query weights. Non-negative; zero
/// for an empty weight list or a chunk sharing no term with the query.
pub fn score(weights: &[TermWeight], chunk: &Chunk) -> f64 {
    weights
        .iter()
        .map(|w| f64::from(chunk.term_count(&w.term)) * w.idf)
        .sum()
}
