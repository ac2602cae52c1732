//! API route handlers.
//!
//! The knowledge-search handlers are deliberately lenient: a malformed
//! body, a missing field, or a non-numeric `topK` falls back to defaults
//! instead of erroring. "No matches" is a 200 with empty `chunks`; only an
//! unavailable engine produces an error status (503), so the two cases stay
//! observably distinct.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::auth::{Role, SessionAuth};
use crate::retrieval::{Chunk, RetrievalEngine};

use super::envelope::ApiErrorResponse;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Retrieval engine, built once at startup. `None` only when startup
    /// wiring failed in a way the process chose to survive; requests then
    /// receive 503 rather than fabricated empty results.
    pub engine: Option<Arc<RetrievalEngine>>,
}

impl ApiState {
    pub fn new(engine: Arc<RetrievalEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// State with no engine — every search request gets 503.
    pub fn unavailable() -> Self {
        Self { engine: None }
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "topK")]
    pub top_k: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchReply {
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Serialize)]
pub struct MeReply {
    pub id: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub status: &'static str,
    pub corpus_chunks: usize,
}

// ============================================================================
// Handlers
// ============================================================================

fn run_search(state: &ApiState, query: &str, top_k: Option<i64>) -> Response {
    match &state.engine {
        Some(engine) => {
            let chunks = engine.search(query, top_k);
            Json(SearchReply { chunks }).into_response()
        }
        None => {
            error!("knowledge search requested but the retrieval engine is unavailable");
            ApiErrorResponse::service_unavailable("Knowledge base unavailable")
        }
    }
}

/// GET /api/knowledge/search?q=...&topK=...
pub async fn search_get(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let top_k = params.top_k.as_deref().and_then(|v| v.trim().parse().ok());
    run_search(&state, params.q.as_deref().unwrap_or(""), top_k)
}

/// POST /api/knowledge/search with JSON body `{"query": ..., "topK": ...}`.
///
/// The body is parsed from raw bytes so that invalid JSON degrades to the
/// empty query instead of a 4xx — same engine contract as the GET binding.
pub async fn search_post(State(state): State<ApiState>, body: Bytes) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let query = body
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let top_k = body.get("topK").and_then(lenient_i64);
    run_search(&state, query, top_k)
}

/// Accept a JSON number or a numeric string; anything else is "missing".
fn lenient_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// GET /api/auth/me — the verified principal behind the session cookie.
pub async fn get_me(auth: SessionAuth) -> Json<MeReply> {
    Json(MeReply {
        id: auth.claims.sub,
        role: auth.claims.role,
    })
}

/// GET /health — liveness plus corpus size.
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok",
        corpus_chunks: state.engine.as_ref().map_or(0, |e| e.store().size()),
    })
}
