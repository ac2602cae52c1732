//! Deterministic ranking and top-K selection.

use std::cmp::Ordering;

/// A chunk's score paired with its ingestion index. Ephemeral, one batch
/// per request.
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk {
    pub index: usize,
    pub score: f64,
}

/// Order scored chunks and return the ingestion indices of the top `k`.
///
/// Zero-score chunks are excluded outright — a query that matches nothing
/// returns an empty result, never arbitrary padding. Ties break ascending
/// by ingestion index, which makes the order total for any fixed corpus and
/// query regardless of scoring evaluation order. `total_cmp` keeps the sort
/// well-defined for every f64 the scorer can produce.
pub fn select(scored: Vec<ScoredChunk>, k: usize) -> Vec<usize> {
    let mut hits: Vec<ScoredChunk> = scored.into_iter().filter(|s| s.score > 0.0).collect();
    hits.sort_unstable_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.index.cmp(&b.index),
        other => other,
    });
    hits.truncate(k);
    hits.into_iter().map(|s| s.index).collect()
}
