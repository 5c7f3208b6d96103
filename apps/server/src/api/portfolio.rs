use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use tradebook_core::ledger::PortfolioEntry;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReturnsResponse {
    total_return: Decimal,
}

async fn get_portfolio(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PortfolioEntry>>> {
    let portfolio = state.ledger_service.get_portfolio()?;
    if portfolio.is_empty() {
        return Err(ApiError::NotFound("Portfolio is empty".to_string()));
    }
    Ok(Json(portfolio))
}

async fn get_returns(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReturnsResponse>> {
    state
        .ledger_service
        .get_returns()?
        .map(|total_return| Json(ReturnsResponse { total_return }))
        .ok_or_else(|| ApiError::NotFound("No holdings to compute returns for".to_string()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(get_portfolio))
        .route("/returns", get(get_returns))
}
