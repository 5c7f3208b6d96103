use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tradebook_core::holdings::Holding;

async fn get_holding(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Holding>> {
    state
        .ledger_service
        .get_holding(&ticker)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No holding for {}", ticker)))
}

async fn get_holdings(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = state.ledger_service.get_holdings()?;
    if holdings.is_empty() {
        return Err(ApiError::NotFound("No holdings found".to_string()));
    }
    Ok(Json(holdings))
}

async fn refresh_holdings(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = state.ledger_service.refresh_holdings().await?;
    tracing::info!("Refreshed {} holdings", holdings.len());
    Ok(Json(holdings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings", get(get_holdings))
        .route("/holdings/refresh", post(refresh_holdings))
        .route("/holdings/{ticker}", get(get_holding))
}
