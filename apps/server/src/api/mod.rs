use std::sync::Arc;

use crate::{config::Config, main_lib::AppState, models};
use axum::{routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod dashboard;
pub mod health;
pub mod stocks;

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::dashboard,
        stocks::create_stock,
        stocks::get_stock,
        health::healthz,
        health::readyz
    ),
    components(schemas(
        models::Stock,
        models::NewStockRequest,
        models::StatusResponse,
        models::DashboardFilters,
        models::DashboardResponse
    )),
    tags((name = "screener"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }

    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(stocks::api_router())
        .route("/openapi.json", get(|| async { Json(openapi) }));

    Router::new()
        .merge(dashboard::router())
        .merge(stocks::router())
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors_layer(config))
        // Layers wrap outward: the id must be set before it is propagated.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
