//! HTTP routes, mirroring `caliber-api::routes`'s one-module-per-concern
//! layout scaled down to this crate's single resource.

pub mod health;
pub mod resolve;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::metrics::metrics_handler;
use crate::state::AppState;

#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi as _;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

/// Build the full router: the `resolve` entry point, a health probe, and
/// a Prometheus scrape endpoint, wrapped in the teacher's tracing/CORS
/// middleware stack (`tower_http::trace::TraceLayer` +
/// `tower_http::cors::CorsLayer`, per `caliber-api`'s `Router` setup).
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let router = Router::new()
        .route("/api/v1/resolve", post(resolve::resolve))
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(metrics_handler));

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", get(openapi_json));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi as _;
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", crate::openapi::ApiDoc::openapi()))
    };

    router.layer(TraceLayer::new_for_http()).layer(cors).with_state(state)
}
