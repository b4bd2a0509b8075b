//! Client identity resolution.
//!
//! Session handling lives in the upstream auth proxy, which forwards the
//! authenticated client's email in a request header. This extractor
//! normalizes it (trim + lowercase) and rejects unauthenticated requests.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header set by the auth proxy on authenticated requests
pub const CLIENT_EMAIL_HEADER: &str = "x-client-email";

/// Authenticated client's normalized email
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub String);

/// Normalize an email for comparison and storage
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        None
    } else {
        Some(email)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CLIENT_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(normalize_email)
            .map(ClientIdentity)
            .ok_or(AppError::Unauthenticated)
    }
}
