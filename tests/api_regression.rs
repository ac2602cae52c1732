//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the boundary with `tower::ServiceExt::oneshot()` — no binary spawn, no
//! network port. Covers both transport bindings of the search operation,
//! lenient input handling, session gating, and the 503 channel.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use obstetric_ai::api::{create_app, ApiState};
use obstetric_ai::auth::session::{self, Role};
use obstetric_ai::config::{self, AppConfig};
use obstetric_ai::retrieval::{Chunk, ChunkStore, RetrievalEngine};

const TEST_SECRET: &str = "test-secret-test-secret-test-secret!";

fn ensure_config() {
    if !config::is_initialized() {
        let mut cfg = AppConfig::default();
        cfg.auth.secret = TEST_SECRET.to_string();
        config::init(cfg);
    }
}

fn create_test_state() -> ApiState {
    let store = ChunkStore::from_chunks(vec![
        Chunk::new("1", "fetal heart rate monitoring during labor"),
        Chunk::new("2", "maternal blood pressure screening"),
        Chunk::new("3", "fetal heart rate decelerations"),
    ])
    .expect("valid corpus");
    ApiState::new(Arc::new(RetrievalEngine::new(Arc::new(store))))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

fn chunk_ids(reply: &serde_json::Value) -> Vec<String> {
    reply["chunks"]
        .as_array()
        .expect("chunks array")
        .iter()
        .map(|c| c["id"].as_str().expect("chunk id").to_string())
        .collect()
}

// ============================================================================
// Knowledge search — GET binding
// ============================================================================

#[tokio::test]
async fn test_search_get_returns_ranked_chunks() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/knowledge/search?q=fetal%20heart%20rate&topK=2")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(chunk_ids(&json), ["1", "3"]);
    assert_eq!(
        json["chunks"][0]["chunk_text"],
        "fetal heart rate monitoring during labor"
    );
}

#[tokio::test]
async fn test_search_get_empty_query_is_empty_result() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/knowledge/search")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(chunk_ids(&body_json(resp).await).is_empty());
}

#[tokio::test]
async fn test_search_get_non_numeric_top_k_defaults() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/knowledge/search?q=fetal&topK=abc")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(chunk_ids(&body_json(resp).await), ["1", "3"]);
}

#[tokio::test]
async fn test_search_get_zero_top_k_clamps_to_one() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/knowledge/search?q=fetal&topK=0")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(chunk_ids(&body_json(resp).await), ["1"]);
}

// ============================================================================
// Knowledge search — POST binding
// ============================================================================

#[tokio::test]
async fn test_search_post_returns_ranked_chunks() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/knowledge/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query": "fetal heart rate", "topK": 2}"#))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(chunk_ids(&body_json(resp).await), ["1", "3"]);
}

#[tokio::test]
async fn test_search_post_malformed_body_is_empty_result() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/knowledge/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json ]"))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(
        resp.status(),
        StatusCode::OK,
        "malformed input must not error"
    );
    assert!(chunk_ids(&body_json(resp).await).is_empty());
}

#[tokio::test]
async fn test_search_post_huge_top_k_clamps() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/knowledge/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query": "fetal heart rate", "topK": 1000}"#))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    // Clamp ceiling is 20; only two chunks actually score nonzero here
    assert_eq!(chunk_ids(&body_json(resp).await), ["1", "3"]);
}

#[tokio::test]
async fn test_search_post_string_top_k_accepted() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/knowledge/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query": "fetal", "topK": "1"}"#))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(chunk_ids(&body_json(resp).await).len(), 1);
}

#[tokio::test]
async fn test_get_and_post_bindings_agree() {
    ensure_config();

    let get_resp = create_app(create_test_state())
        .oneshot(
            Request::builder()
                .uri("/api/knowledge/search?q=maternal%20blood%20pressure&topK=5")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    let post_resp = create_app(create_test_state())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/knowledge/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"query": "maternal blood pressure", "topK": 5}"#,
                ))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(body_json(get_resp).await, body_json(post_resp).await);
}

// ============================================================================
// Internal-failure channel
// ============================================================================

#[tokio::test]
async fn test_search_without_engine_is_503_not_empty() {
    ensure_config();
    let app = create_app(ApiState::unavailable());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/knowledge/search?q=fetal")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(resp).await;
    assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
}

// ============================================================================
// Session gating
// ============================================================================

#[tokio::test]
async fn test_auth_me_without_cookie_is_401() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_me_with_valid_cookie() {
    ensure_config();
    let app = create_app(create_test_state());

    let token = session::issue_token(
        TEST_SECRET,
        "user-42",
        Role::Clinician,
        chrono::Duration::hours(24),
    )
    .expect("token issues");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("obs-session={token}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["id"], "user-42");
    assert_eq!(json["role"], "clinician");
}

#[tokio::test]
async fn test_auth_me_with_foreign_cookie_is_401() {
    ensure_config();
    let app = create_app(create_test_state());

    let token = session::issue_token(
        "wrong-secret-wrong-secret-wrong!!",
        "user-42",
        Role::Admin,
        chrono::Duration::hours(24),
    )
    .expect("token issues");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("obs-session={token}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_corpus_size() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["corpus_chunks"], 3);
}
