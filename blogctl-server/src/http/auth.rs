//! Bearer-token principal for reads
//!
//! In `principal_for_reads` mode every GET or HEAD under the API must carry
//! `Authorization: Bearer <token>`; the token becomes the request's
//! [`Principal`]. Writes and `open` mode pass through untouched.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{OptionalFromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::server::AppState;
use crate::config::{AuthConfig, AuthMode};

/// Authenticated caller, stored as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl<S> OptionalFromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned())
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Decide whether a request may proceed, yielding its principal if any.
pub fn authenticate(
    auth: &AuthConfig,
    method: &Method,
    headers: &HeaderMap,
) -> Result<Option<Principal>, ApiError> {
    // HEAD is answered by the GET handlers
    let is_read = *method == Method::GET || *method == Method::HEAD;
    if auth.mode == AuthMode::Open || !is_read {
        return Ok(None);
    }

    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;

    if !auth.tokens.is_empty() && !auth.tokens.iter().any(|accepted| accepted == token) {
        return Err(ApiError::Forbidden {
            reason: "token not accepted".to_owned(),
        });
    }

    Ok(Some(Principal(token.to_owned())))
}

/// Middleware enforcing the configured auth mode
pub async fn require_principal(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(principal) = authenticate(&state.auth, request.method(), request.headers())? {
        tracing::debug!(principal = %principal.0, "Authenticated read");
        request.extensions_mut().insert(principal);
    }
    Ok(next.run(request).await)
}
