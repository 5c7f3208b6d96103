use log::info;
use tradebook_core::errors::Error;
use tradebook_core::ledger::{LedgerCommit, LedgerRepositoryTrait, TradeWrite};
use tradebook_core::trades::Trade;
use tradebook_core::Result;

use crate::db::WriteHandle;
use crate::holdings::apply_change;
use crate::trades::{delete_trade_row, insert_trade, update_trade_row};
use async_trait::async_trait;
use diesel::SqliteConnection;

/// Writes a trade and its holding changes in one writer transaction.
pub struct LedgerRepository {
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(writer: WriteHandle) -> Self {
        LedgerRepository { writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn commit(&self, commit: LedgerCommit) -> Result<Option<Trade>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Trade>> {
                let saved = match commit.trade {
                    TradeWrite::Create(trade) => Some(insert_trade(conn, trade)?),
                    TradeWrite::Update(trade) => Some(update_trade_row(conn, trade)?),
                    TradeWrite::Delete(trade_id) => {
                        if delete_trade_row(conn, &trade_id)? == 0 {
                            return Err(Error::NotFound(format!("Trade {} not found", trade_id)));
                        }
                        None
                    }
                };

                let changed = commit.holdings.changes.len();
                for change in commit.holdings.changes {
                    apply_change(conn, change)?;
                }
                info!("Committed trade write with {} holding change(s)", changed);
                Ok(saved)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, write_actor::spawn_writer, DbPool};
    use crate::holdings::HoldingRepository;
    use crate::trades::TradeRepository;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tradebook_core::holdings::{Holding, HoldingChange, HoldingRepositoryTrait, HoldingsPlan};
    use tradebook_core::trades::{TradeRepositoryTrait, TradeSide};

    struct Fixture {
        ledger: LedgerRepository,
        trades: TradeRepository,
        holdings: HoldingRepository,
        _dir: tempfile::TempDir,
    }

    async fn create_fixture() -> Fixture {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool: Arc<DbPool> = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        Fixture {
            ledger: LedgerRepository::new(writer.clone()),
            trades: TradeRepository::new(pool.clone(), writer.clone()),
            holdings: HoldingRepository::new(pool, writer),
            _dir: temp_dir,
        }
    }

    fn buy(ticker: &str) -> Trade {
        Trade::new(
            ticker,
            TradeSide::Buy,
            dec!(10),
            5,
            Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap(),
        )
    }

    fn holding(ticker: &str, shares: i64) -> Holding {
        Holding {
            ticker: ticker.to_string(),
            total_cost: dec!(10) * rust_decimal::Decimal::from(shares),
            shares,
            average_price: dec!(10),
            last_updated: Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_commit_writes_trade_and_holding() {
        let fx = create_fixture().await;
        let saved = fx
            .ledger
            .commit(LedgerCommit {
                trade: TradeWrite::Create(buy("AAA")),
                holdings: HoldingsPlan {
                    changes: vec![HoldingChange::Save(holding("AAA", 5))],
                },
            })
            .await
            .unwrap()
            .expect("created trade returned");

        assert!(saved.id.is_some());
        assert_eq!(fx.trades.list_trades().unwrap().len(), 1);
        assert_eq!(fx.holdings.get_holding("AAA").unwrap().unwrap().shares, 5);
    }

    #[tokio::test]
    async fn test_failed_change_rolls_back_whole_commit() {
        let fx = create_fixture().await;
        fx.holdings.save_holding(holding("AAA", 8)).await.unwrap();

        let err = fx
            .ledger
            .commit(LedgerCommit {
                trade: TradeWrite::Create(buy("BBB")),
                holdings: HoldingsPlan {
                    changes: vec![
                        HoldingChange::Save(holding("AAA", 3)),
                        HoldingChange::Delete("MISSING".to_string()),
                    ],
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert!(fx.trades.list_trades().unwrap().is_empty());
        assert_eq!(fx.holdings.get_holding("AAA").unwrap().unwrap().shares, 8);
    }

    #[tokio::test]
    async fn test_delete_commit_removes_trade_and_closed_holding() {
        let fx = create_fixture().await;
        let created = fx.trades.create_trade(buy("AAA")).await.unwrap();
        fx.holdings.save_holding(holding("AAA", 5)).await.unwrap();

        let result = fx
            .ledger
            .commit(LedgerCommit {
                trade: TradeWrite::Delete(created.id_str().to_string()),
                holdings: HoldingsPlan {
                    changes: vec![HoldingChange::Delete("AAA".to_string())],
                },
            })
            .await
            .unwrap();

        assert_eq!(result, None);
        assert!(fx.trades.list_trades().unwrap().is_empty());
        assert!(fx.holdings.list_holdings().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_commit_of_unknown_trade_fails() {
        let fx = create_fixture().await;
        let err = fx
            .ledger
            .commit(LedgerCommit {
                trade: TradeWrite::Update(buy("AAA").with_id("nope")),
                holdings: HoldingsPlan::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
