//! Immutable in-memory chunk store.
//!
//! Built exactly once at process start from the ingestion pipeline's output
//! (`knowledge-chunks.json`) and read-only for the process lifetime. The
//! store also owns the corpus-wide idf table, precomputed here because idf
//! weights are constants of the corpus, not of any query — recomputing them
//! per request would re-scan the whole corpus twice.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::normalize;

/// A unit of retrievable knowledge, pre-segmented by the ingestion pipeline.
///
/// The serialized shape matches the ingestion output: `chunk_text` carries
/// the content, the remaining fields are citation metadata. `tokens` is
/// derived from `text` once at load time and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "chunk_text")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    #[serde(skip)]
    tokens: Vec<String>,
    #[serde(skip)]
    term_counts: HashMap<String, u32>,
}

impl Chunk {
    /// Build a bare chunk. Tokens are computed when the chunk enters a
    /// [`ChunkStore`], not here.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: String::new(),
            title: None,
            authors: None,
            year: None,
            text: text.into(),
            metadata: None,
            tokens: Vec::new(),
            term_counts: HashMap::new(),
        }
    }

    /// Normalized terms of `text`, in encounter order. Always a pure
    /// function of `text`; populated at store construction.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Occurrences of `term` in this chunk's tokens.
    pub(crate) fn term_count(&self, term: &str) -> u32 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    fn index_tokens(&mut self) {
        self.tokens = normalize::tokenize(&self.text);
        self.term_counts.clear();
        for term in &self.tokens {
            *self.term_counts.entry(term.clone()).or_insert(0) += 1;
        }
    }
}

/// Corpus construction failures. All of these are fatal at process start —
/// the engine must not serve from a store that failed validation.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse corpus file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("corpus contains no servable chunks")]
    EmptyCorpus,
    #[error("chunk {id} has empty text")]
    EmptyChunkText { id: String },
}

/// Immutable chunk collection plus the precomputed idf table.
#[derive(Debug)]
pub struct ChunkStore {
    chunks: Vec<Chunk>,
    idf: HashMap<String, f64>,
}

impl ChunkStore {
    /// Read the ingestion pipeline's JSON output and build the store.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let raw = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let chunks: Vec<Chunk> =
            serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_chunks(chunks)
    }

    /// Build the store from already-deserialized chunks.
    ///
    /// Validation: an empty chunk list or any chunk whose text trims to
    /// empty is an error. A chunk whose text normalizes to zero terms is
    /// dropped and logged — it can never match a query, so serving it would
    /// only pad results. Ingestion index (position in the served list) is
    /// the ranker's tie-break key.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self, CorpusError> {
        if chunks.is_empty() {
            return Err(CorpusError::EmptyCorpus);
        }

        let mut served = Vec::with_capacity(chunks.len());
        for mut chunk in chunks {
            if chunk.text.trim().is_empty() {
                return Err(CorpusError::EmptyChunkText { id: chunk.id });
            }
            chunk.index_tokens();
            if chunk.tokens().is_empty() {
                warn!(id = %chunk.id, "chunk text normalized to zero terms — dropping");
                continue;
            }
            served.push(chunk);
        }

        if served.is_empty() {
            return Err(CorpusError::EmptyCorpus);
        }

        let idf = compute_idf(&served);
        info!(
            chunks = served.len(),
            terms = idf.len(),
            "knowledge corpus loaded"
        );

        Ok(Self { chunks: served, idf })
    }

    /// Served chunks, in ingestion order.
    pub fn all_chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn size(&self) -> usize {
        self.chunks.len()
    }

    /// Cached inverse-document-frequency weight for a normalized term.
    /// `None` means no served chunk contains the term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }
}

/// idf(term) = ln((N + 1) / (df + 1)) + 1 over the served chunk set.
/// Rarer terms weight higher; the +1 smoothing keeps every weight positive.
fn compute_idf(chunks: &[Chunk]) -> HashMap<String, f64> {
    let n = chunks.len() as f64;
    let mut df: HashMap<&str, u32> = HashMap::new();
    for chunk in chunks {
        for term in chunk.term_counts.keys() {
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(term, d)| {
            let weight = ((n + 1.0) / (f64::from(d) + 1.0)).ln() + 1.0;
            (term.to_string(), weight)
        })
        .collect()
}
