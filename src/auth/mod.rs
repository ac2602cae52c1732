//! Session authentication extractors.
//!
//! The retrieval core never consumes identity; the HTTP boundary gates
//! protected endpoints with [`SessionAuth`]. User records, passwords, and
//! 2FA live in the identity service — this crate only verifies the session
//! cookie it issued.

pub mod session;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::response::Response;
use tracing::debug;

pub use session::{AuthError, Role, SessionClaims, SESSION_COOKIE};

use crate::api::envelope::ApiErrorResponse;

/// Verified principal extracted from the `obs-session` cookie.
pub struct SessionAuth {
    pub claims: SessionClaims,
}

/// Pull the session cookie value out of the `Cookie` header.
fn session_cookie(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = session_cookie(parts)
            .ok_or_else(|| ApiErrorResponse::unauthorized("Missing session cookie"))?;

        let secret = &crate::config::get().auth.secret;
        match session::verify_token(secret, &token) {
            Ok(claims) => Ok(Self { claims }),
            Err(e) => {
                debug!(error = %e, "session cookie rejected");
                Err(ApiErrorResponse::unauthorized("Invalid or expired session"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header::COOKIE, cookie)
            .body(())
            .expect("request builds")
            .into_parts();
        parts
    }

    #[test]
    fn test_session_cookie_found_among_others() {
        let parts = parts_with_cookie("theme=dark; obs-session=tok123; lang=fr");
        assert_eq!(session_cookie(&parts).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_session_cookie_absent() {
        let parts = parts_with_cookie("theme=dark; lang=fr");
        assert_eq!(session_cookie(&parts), None);
    }
}
