use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{DashboardFilters, DashboardResponse, Stock},
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

/// Lists stored stocks that pass every active filter, in insertion order.
#[utoipa::path(
    get,
    path = "/",
    params(DashboardFilters),
    responses(
        (status = 200, body = DashboardResponse),
        (status = 400, description = "A numeric filter is not a number")
    )
)]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<DashboardFilters>,
) -> ApiResult<Json<DashboardResponse>> {
    let filter = filters.to_filter()?;
    let stocks = state.stock_service.screen_stocks(&filter)?;
    Ok(Json(DashboardResponse {
        stocks: stocks.into_iter().map(Stock::from).collect(),
        filters,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard))
}
