use log::debug;
use tradebook_core::errors::Error;
use tradebook_core::holdings::{Holding, HoldingChange, HoldingRepositoryTrait};
use tradebook_core::Result;

use super::model::HoldingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::holdings;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        HoldingRepository { pool, writer }
    }
}

fn upsert_holding(conn: &mut SqliteConnection, holding: Holding) -> Result<Holding> {
    let holding_db: HoldingDB = holding.into();
    diesel::insert_into(holdings::table)
        .values(&holding_db)
        .on_conflict(holdings::ticker)
        .do_update()
        .set(&holding_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    Holding::try_from(holding_db)
}

fn delete_holding_row(conn: &mut SqliteConnection, ticker: &str) -> Result<usize> {
    Ok(diesel::delete(holdings::table.find(ticker))
        .execute(conn)
        .map_err(StorageError::from)?)
}

/// Applies one planned change. Deleting a holding that is not stored means
/// the plan was made against stale state, so it fails the enclosing commit.
pub(crate) fn apply_change(conn: &mut SqliteConnection, change: HoldingChange) -> Result<()> {
    match change {
        HoldingChange::Save(holding) => {
            debug!("Saving holding {}: {} shares", holding.ticker, holding.shares);
            upsert_holding(conn, holding)?;
        }
        HoldingChange::Delete(ticker) => {
            debug!("Removing closed holding {}", ticker);
            if delete_holding_row(conn, &ticker)? == 0 {
                return Err(Error::NotFound(format!("Holding for {} not found", ticker)));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn get_holding(&self, ticker: &str) -> Result<Option<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let row = holdings::table
            .find(ticker)
            .select(HoldingDB::as_select())
            .first::<HoldingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Holding::try_from).transpose()
    }

    fn list_holdings(&self) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        holdings::table
            .select(HoldingDB::as_select())
            .order(holdings::ticker.asc())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(Holding::try_from)
            .collect()
    }

    async fn save_holding(&self, holding: Holding) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                upsert_holding(conn, holding)
            })
            .await
    }

    async fn delete_holding(&self, ticker: &str) -> Result<usize> {
        let ticker = ticker.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                delete_holding_row(conn, &ticker)
            })
            .await
    }

    async fn replace_all_holdings(&self, new_holdings: Vec<Holding>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed = diesel::delete(holdings::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let rows: Vec<HoldingDB> = new_holdings.into_iter().map(HoldingDB::from).collect();
                let inserted = if rows.is_empty() {
                    0
                } else {
                    diesel::insert_into(holdings::table)
                        .values(&rows)
                        .execute(conn)
                        .map_err(StorageError::from)?
                };
                debug!("Replaced {} holdings with {}", removed, inserted);
                Ok(inserted)
            })
            .await
    }
}
