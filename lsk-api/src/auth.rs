//! Development-only authentication.
//!
//! Real session/OAuth handling is an out-of-scope external collaborator
//! (see `SPEC_FULL.md` §6). `DevAuth` exists only so the router is
//! exercisable without one: it takes the caller's email verbatim from a
//! `Bearer` token and does not verify anything. Do not wire this into a
//! deployment that has a real identity provider available.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

pub struct DevAuth {
    pub dev_email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for DevAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;

        let dev_email = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Authorization header must be a Bearer token"))?
            .trim();

        if dev_email.is_empty() {
            return Err(ApiError::unauthorized("bearer token is empty"));
        }

        Ok(DevAuth {
            dev_email: dev_email.to_string(),
        })
    }
}
