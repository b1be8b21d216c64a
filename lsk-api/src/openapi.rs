//! OpenAPI document for the LSK Resolution Engine API, grounded on
//! `caliber-api::openapi::ApiDoc` but scoped to this crate's one real
//! route plus health/metrics.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{health, resolve};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LSK Resolution Engine API",
        version = "0.4.0",
        description = "Rewrites XML documents carrying symbolic logical-identifier placeholders into documents carrying concrete, database-assigned integers.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(resolve::resolve, health::healthz),
    components(schemas(
        resolve::ResolveBody,
        resolve::ResolveResponse,
        health::HealthResponse,
        health::HealthStatus,
        ApiError,
        ErrorCode,
    )),
    tags(
        (name = "Resolution", description = "The resolve() entry point"),
        (name = "Health", description = "Liveness/readiness probe"),
    )
)]
pub struct ApiDoc;
