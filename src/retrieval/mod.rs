//! Knowledge retrieval engine.
//!
//! Given a free-text clinical query, returns the top-K most relevant chunks
//! of the obstetric knowledge corpus for the downstream reasoning layer.
//! Composition: [`store::ChunkStore`] (immutable corpus + idf table, built
//! once at startup) → [`normalize`] (query canonicalization) → [`scorer`]
//! (tf-idf) → [`ranker`] (deterministic top-K selection).
//!
//! The engine is a pure function of store state and inputs — no locking, no
//! I/O, safe for unlimited concurrent invocation behind an `Arc`.

pub mod normalize;
pub mod ranker;
pub mod scorer;
pub mod store;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

pub use normalize::NormalizedQuery;
pub use store::{Chunk, ChunkStore, CorpusError};

use ranker::ScoredChunk;

/// Top-K when the caller sends none (or something non-numeric).
pub const DEFAULT_TOP_K: usize = 10;

/// Hard ceiling on requested K.
pub const MAX_TOP_K: usize = 20;

/// Clamp a caller-supplied K into `[1, MAX_TOP_K]`. Clamping also happens
/// at the HTTP boundary, but the engine enforces it too so it is safe to
/// call directly.
fn clamp_top_k(requested: Option<i64>) -> usize {
    let k = requested.unwrap_or(DEFAULT_TOP_K as i64);
    usize::try_from(k.clamp(1, MAX_TOP_K as i64)).unwrap_or(DEFAULT_TOP_K)
}

/// Facade over the retrieval pipeline. Shared read-only across requests.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    store: Arc<ChunkStore>,
}

impl RetrievalEngine {
    pub fn new(store: Arc<ChunkStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Retrieve the top-K chunks for a raw query, highest relevance first.
    ///
    /// Never errors at request time: an empty or unmatched query returns an
    /// empty result. Scoring fans out across chunks with rayon; the output
    /// is deterministic regardless, since the ranker's tie-break does not
    /// depend on evaluation order.
    pub fn search(&self, raw_query: &str, requested_k: Option<i64>) -> Vec<Chunk> {
        let k = clamp_top_k(requested_k);

        let query = NormalizedQuery::parse(raw_query);
        if query.is_empty() {
            return Vec::new();
        }

        let weights = scorer::query_weights(&query, &self.store);
        if weights.is_empty() {
            debug!(query = query.raw_text(), "no query term occurs in the corpus");
            return Vec::new();
        }

        let scored: Vec<ScoredChunk> = self
            .store
            .all_chunks()
            .par_iter()
            .enumerate()
            .map(|(index, chunk)| ScoredChunk {
                index,
                score: scorer::score(&weights, chunk),
            })
            .collect();

        let selected = ranker::select(scored, k);
        debug!(
            query = query.raw_text(),
            k,
            hits = selected.len(),
            "knowledge search complete"
        );

        selected
            .into_iter()
            .filter_map(|index| self.store.all_chunks().get(index).cloned())
            .collect()
    }
}
