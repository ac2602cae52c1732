//! Obstetric AI: clinical decision-support service.
//!
//! The core is the knowledge-retrieval engine behind `/api/knowledge/search`
//! — deterministic tf-idf ranking over a fixed obstetric corpus, feeding the
//! downstream AI reasoning layer. Around it: session-cookie verification, a
//! FHIR client for the clinical-records service, and the axum boundary.
//!
//! ## Architecture
//!
//! - **Retrieval Engine**: chunk store + idf table (built once at startup),
//!   query normalizer, tf-idf scorer, deterministic ranker
//! - **API**: axum routes, lenient request marshalling, uniform error envelope
//! - **Auth**: HS256 session tokens, `SessionAuth` extractor
//! - **FHIR**: base-URL-configured client for the records service

pub mod api;
pub mod auth;
pub mod config;
pub mod fhir;
pub mod retrieval;

// Re-export configuration
pub use config::AppConfig;

// Re-export the retrieval surface
pub use retrieval::{
    Chunk, ChunkStore, CorpusError, NormalizedQuery, RetrievalEngine, DEFAULT_TOP_K, MAX_TOP_K,
};

// Re-export commonly used collaborator types
pub use auth::{Role, SessionClaims};
pub use fhir::{FhirClient, FhirError};
