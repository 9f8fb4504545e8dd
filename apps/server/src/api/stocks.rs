use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{NewStockRequest, StatusResponse, Stock},
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

/// Stores a bare record and schedules its enrichment. Responds before
/// enrichment runs.
#[utoipa::path(
    post,
    path = "/stock",
    request_body = NewStockRequest,
    responses(
        (status = 200, body = StatusResponse),
        (status = 400, description = "Missing or blank symbol")
    )
)]
pub async fn create_stock(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewStockRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let stock = state.stock_service.create_stock(&body.symbol).await?;
    tracing::info!("Stock {} created with id {}", stock.symbol, stock.id);
    Ok(Json(StatusResponse::success("stock created")))
}

#[utoipa::path(
    get,
    path = "/api/v1/stocks/{id}",
    params(("id" = i32, Path, description = "Stock id")),
    responses((status = 200, body = Stock), (status = 404, description = "No such stock"))
)]
pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Stock>> {
    let stock = state
        .stock_service
        .get_stock(id)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(Stock::from(stock)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stock", post(create_stock))
}

/// Routes mounted under `/api/v1`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new().route("/stocks/{id}", get(get_stock))
}
