//! Caller identity from the Identity-Aware Proxy.
//!
//! The proxy in front of this service authenticates every request and forwards
//! a signed JWT in [`IAP_JWT_HEADER`]. No claim or signature is verified here:
//! only the proxy can set that header, so its verification is trusted as-is.
//! Anything that exposes this service without the proxy must add verification
//! first.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

use crate::errors::AppError;

/// Header carrying the proxy's identity assertion.
pub const IAP_JWT_HEADER: &str = "x-goog-iap-jwt-assertion";

/// Proxy endpoint that signs the user out.
pub const LOGOUT_URL: &str = "/_gcp_iap/clear_login_cookie";

/// Claims read from the assertion payload.
#[derive(Debug, Deserialize)]
struct AssertionClaims {
    #[serde(default)]
    email: Option<String>,
}

/// Decode the caller's email from a proxy assertion.
///
/// Only the payload segment is read, so the header's `alg` and the signature
/// never affect the result. Returns `Ok(None)` for a missing or empty token
/// and for a token without an `email` claim. An `email` claim that is not a
/// string makes the whole token `MalformedAssertion`, which callers treat as
/// anonymous.
pub fn resolve_identity(assertion: Option<&str>) -> Result<Option<String>, AppError> {
    let token = match assertion {
        Some(token) if !token.is_empty() => token,
        _ => return Ok(None),
    };

    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(malformed("expected three dot-separated segments"));
    };

    decode_segment::<serde_json::Map<String, serde_json::Value>>(header)?;
    let claims: AssertionClaims = decode_segment(payload)?;

    Ok(claims.email)
}

/// Base64url-decode one token segment and parse it as JSON.
fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| malformed(&e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| malformed(&e.to_string()))
}

fn malformed(reason: &str) -> AppError {
    AppError::MalformedAssertion(format!("Malformed identity assertion: {}", reason))
}

/// Identity of the caller as asserted by the proxy.
///
/// Only constructed by the request extractor, so handlers never see an
/// identity that did not come through the proxy header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreVerifiedIdentity {
    email: Option<String>,
}

impl PreVerifiedIdentity {
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.email.is_none()
    }

    /// Sign-in/sign-out link and its label for the page header.
    pub fn session_link(&self) -> (&'static str, &'static str) {
        if self.is_anonymous() {
            ("/", "Login")
        } else {
            (LOGOUT_URL, "Logout")
        }
    }
}

impl<S> FromRequestParts<S> for PreVerifiedIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(IAP_JWT_HEADER);
        let assertion = match header.map(|v| v.to_str()) {
            Some(Ok(value)) => Some(value),
            Some(Err(_)) => {
                tracing::warn!("Identity assertion header is not valid text; treating caller as anonymous");
                None
            }
            None => None,
        };

        let email = crate::telemetry::traced_sync("resolve_identity", || {
            resolve_identity(assertion)
        })
        .unwrap_or_else(|e| {
            tracing::warn!("{}; treating caller as anonymous", e);
            None
        });

        Ok(Self { email })
    }
}
