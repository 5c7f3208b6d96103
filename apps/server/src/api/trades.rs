use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tradebook_core::trades::Trade;

async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(mut trade): Json<Trade>,
) -> ApiResult<(StatusCode, Json<Trade>)> {
    // Ids are assigned by the store.
    trade.id = None;
    let saved = state.ledger_service.add_trade(trade).await?;
    tracing::info!("Created trade {}", saved.id_str());
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(trade): Json<Trade>,
) -> ApiResult<Json<Trade>> {
    let saved = state.ledger_service.update_trade(&id, trade).await?;
    tracing::info!("Updated trade {}", id);
    Ok(Json(saved))
}

async fn delete_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Trade>> {
    let deleted = state.ledger_service.delete_trade(&id).await?;
    tracing::info!("Deleted trade {}", id);
    Ok(Json(deleted))
}

async fn get_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Trade>> {
    state
        .ledger_service
        .get_trade(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Trade {} not found", id)))
}

async fn get_trades(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Trade>>> {
    let trades = state.ledger_service.get_trades()?;
    if trades.is_empty() {
        return Err(ApiError::NotFound("No trades found".to_string()));
    }
    Ok(Json(trades))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trades", get(get_trades).post(create_trade))
        .route(
            "/trades/{id}",
            get(get_trade).put(update_trade).delete(delete_trade),
        )
}
