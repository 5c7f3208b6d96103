use tradebook_core::errors::Error;
use tradebook_core::trades::{Trade, TradeRepositoryTrait};
use tradebook_core::Result;

use super::model::TradeDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::trades;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct TradeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TradeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TradeRepository { pool, writer }
    }

    fn load(&self, ticker_filter: Option<&str>) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = trades::table.select(TradeDB::as_select()).into_boxed();
        if let Some(ticker) = ticker_filter {
            query = query.filter(trades::ticker.eq(ticker.to_string()));
        }
        let rows = query
            .order((trades::traded_at.asc(), trades::id.asc()))
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut loaded = rows
            .into_iter()
            .map(Trade::try_from)
            .collect::<Result<Vec<Trade>>>()?;
        // Text ordering is only approximate across fractional-second widths.
        loaded.sort_by_key(|t| t.timestamp);
        Ok(loaded)
    }
}

/// Inserts `trade`, assigning a new UUID when it has no id.
pub(crate) fn insert_trade(conn: &mut SqliteConnection, trade: Trade) -> Result<Trade> {
    let id = trade
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let trade_db = TradeDB::from_trade(trade, id);

    let result_db = diesel::insert_into(trades::table)
        .values(&trade_db)
        .returning(TradeDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?;
    Trade::try_from(result_db)
}

/// Overwrites the stored trade with `trade`'s id.
pub(crate) fn update_trade_row(conn: &mut SqliteConnection, trade: Trade) -> Result<Trade> {
    let id = trade
        .id
        .clone()
        .ok_or_else(|| Error::NotFound("Cannot update a trade without an id".to_string()))?;
    let trade_db = TradeDB::from_trade(trade, id.clone());

    let updated = diesel::update(trades::table.find(&id))
        .set(&trade_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    if updated == 0 {
        return Err(Error::NotFound(format!("Trade {} not found", id)));
    }

    let result_db = trades::table
        .find(&id)
        .select(TradeDB::as_select())
        .first::<TradeDB>(conn)
        .map_err(StorageError::from)?;
    Trade::try_from(result_db)
}

pub(crate) fn delete_trade_row(conn: &mut SqliteConnection, trade_id: &str) -> Result<usize> {
    Ok(diesel::delete(trades::table.find(trade_id))
        .execute(conn)
        .map_err(StorageError::from)?)
}

#[async_trait]
impl TradeRepositoryTrait for TradeRepository {
    fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let row = trades::table
            .find(trade_id)
            .select(TradeDB::as_select())
            .first::<TradeDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Trade::try_from).transpose()
    }

    fn list_trades(&self) -> Result<Vec<Trade>> {
        self.load(None)
    }

    fn list_trades_by_ticker(&self, ticker: &str) -> Result<Vec<Trade>> {
        self.load(Some(ticker))
    }

    async fn create_trade(&self, trade: Trade) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                insert_trade(conn, trade)
            })
            .await
    }

    async fn update_trade(&self, trade: Trade) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                update_trade_row(conn, trade)
            })
            .await
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<usize> {
        let trade_id = trade_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                delete_trade_row(conn, &trade_id)
            })
            .await
    }
}
