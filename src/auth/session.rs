//! HS256 session tokens.
//!
//! Compact `header.claims.signature` tokens (base64url, HMAC-SHA256),
//! carried in the `obs-session` httpOnly cookie. Issuance happens at login
//! in the identity service; this module is the shared issue/verify core.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "obs-session";

const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    Signature,
    #[error("session expired")]
    Expired,
    #[error("claims encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Principal roles, least privilege last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Clinician,
    Readonly,
}

/// Verified session claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

fn sign(secret: &str, input: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(input);
    mac.finalize().into_bytes().to_vec()
}

/// Issue a signed session token for a verified principal.
pub fn issue_token(
    secret: &str,
    user_id: &str,
    role: Role,
    ttl: chrono::Duration,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        role,
        iat: now,
        exp: now + ttl.num_seconds(),
    };

    let header = URL_SAFE_NO_PAD.encode(TOKEN_HEADER);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let signing_input = format!("{header}.{payload}");
    let signature = URL_SAFE_NO_PAD.encode(sign(secret, signing_input.as_bytes()));
    Ok(format!("{signing_input}.{signature}"))
}

/// Verify a token's signature and expiry, returning its claims.
///
/// The signature check runs before any claims decoding, and the comparison
/// is constant-time (`Mac::verify_slice`).
pub fn verify_token(secret: &str, token: &str) -> Result<SessionClaims, AuthError> {
    let mut parts = token.split('.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => return Err(AuthError::Malformed),
    };

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::Malformed)?;
    let signing_input = format!("{header}.{payload}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::Signature)?;

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::Malformed)?;
    let claims: SessionClaims = serde_json::from_slice(&claims_bytes)?;

    if claims.exp <= chrono::Utc::now().timestamp() {
        return Err(AuthError::Expired);
    }
    Ok(claims)
}
