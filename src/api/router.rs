use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::auth;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::products;
use super::seed;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// `/seed` is mounted only when the state carries a seed service, and the
/// metrics endpoint only when a recorder was installed.
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/auth", auth::create_auth_router())
        .nest("/products", products::create_products_router());

    if state.seed_service.is_some() {
        router = router.nest("/seed", seed::create_seed_router());
    }

    let mut router = router.with_state(state);

    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics, metrics_path));
    }

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
