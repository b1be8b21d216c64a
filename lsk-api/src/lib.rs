//! LSK API - HTTP Boundary for the LSK Resolution Engine
//!
//! Realizes the HTTP collaborator contract from `spec.md` §6 as a thin
//! Axum service: one `POST /api/v1/resolve` endpoint over
//! `lsk_engine::ResolutionCoordinator`, plus `/healthz` and `/metrics`.
//! Everything this crate does beyond that one route — auth, CORS,
//! logging, connection pooling — is explicitly out of the core's scope
//! (`spec.md` §1) and lives here only so the workspace has a runnable
//! edge; see `auth::DevAuth`'s doc comment for what it deliberately does
//! not do.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use metrics::Metrics;
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
