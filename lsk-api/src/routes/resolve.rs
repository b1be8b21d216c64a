//! `POST /api/v1/resolve` - the one endpoint that matters.
//!
//! Thin adapter over `lsk_engine::ResolutionCoordinator::resolve`: parse
//! the JSON body, fold Phase B and Phase E onto one transaction (the
//! recommended default per `SPEC_FULL.md` §4.3), and translate the
//! result into the `{code, message, details}` envelope from `error.rs`.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use lsk_db::{TxAuditLogStore, TxRangeAllocator};
use lsk_engine::ResolveRequest;
use serde::{Deserialize, Serialize};

use crate::auth::DevAuth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body. Recognized fields are exactly `moduleName` and
/// `xmlContent`, per `spec.md` §6's HTTP collaborator contract.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResolveBody {
    pub module_name: String,
    pub xml_content: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub resolved_xml: String,
}

fn outcome_label(result: &ApiResult<String>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(err) => match err.code {
            crate::error::ErrorCode::InvalidArgument => "invalid_argument",
            crate::error::ErrorCode::InvalidPlaceholder => "invalid_placeholder",
            crate::error::ErrorCode::UnresolvedReference => "unresolved_reference",
            crate::error::ErrorCode::AllocationFailed => "allocation_failed",
            crate::error::ErrorCode::AuditWriteFailed => "audit_write_failed",
            crate::error::ErrorCode::Unauthorized => "unauthorized",
            crate::error::ErrorCode::InternalError => "internal",
        },
    }
}

#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        post,
        path = "/api/v1/resolve",
        request_body = ResolveBody,
        responses(
            (status = 200, description = "Document resolved", body = ResolveResponse),
            (status = 400, description = "Caller error (bad placeholder, unresolved FK, ...)"),
            (status = 500, description = "Allocation or audit-write failure"),
        ),
        tag = "Resolution",
    )
)]
pub async fn resolve(
    State(state): State<AppState>,
    auth: DevAuth,
    Json(body): Json<ResolveBody>,
) -> ApiResult<Json<ResolveResponse>> {
    let started = Instant::now();
    let result = run_resolve(&state, auth.dev_email, body).await;

    state
        .metrics
        .record_resolution(outcome_label(&result), started.elapsed().as_secs_f64());

    result.map(|resolved_xml| Json(ResolveResponse { resolved_xml }))
}

async fn run_resolve(state: &AppState, dev_email: String, body: ResolveBody) -> ApiResult<String> {
    let mut conn = state.pool.get().await?;
    let tx = conn.transaction().await.map_err(ApiError::from)?;

    let allocator = TxRangeAllocator::new(&tx);
    let audit = TxAuditLogStore::new(&tx);

    let req = ResolveRequest {
        module_name: body.module_name,
        input_xml: body.xml_content,
        dev_email,
    };

    let resolved = state.coordinator.resolve(&allocator, &audit, &req).await;

    match resolved {
        Ok(resolved_xml) => {
            tx.commit().await.map_err(ApiError::from)?;
            Ok(resolved_xml)
        }
        // Dropping `tx` here rolls it back (tokio_postgres::Transaction's
        // Drop issues ROLLBACK on an uncommitted transaction); commit is
        // simply never called on this path.
        Err(err) => Err(ApiError::from(err)),
    }
}
