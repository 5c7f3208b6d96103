use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::ledger_model::{LedgerCommit, PortfolioEntry, TradeWrite};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use crate::errors::{Error, Result};
use crate::holdings::{
    plan_add, plan_delete, plan_update, reconcile_all, Holding, HoldingRepositoryTrait,
};
use crate::returns::{total_return, MarkPriceSourceTrait};
use crate::trades::{validate_trade, Trade, TradeRepositoryTrait, TradeSide};

/// Service keeping trades and holdings consistent.
///
/// Mutations on the same ticker are serialized through per-ticker locks; a
/// full rebuild excludes all mutations while it runs. Each mutation runs on
/// its own task, so its locks are held until its commit lands even when the
/// caller stops waiting.
pub struct LedgerService {
    state: Arc<LedgerState>,
}

struct LedgerState {
    trade_repository: Arc<dyn TradeRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    mark_prices: Arc<dyn MarkPriceSourceTrait>,
    ticker_locks: DashMap<String, Arc<Mutex<()>>>,
    rebuild_lock: RwLock<()>,
}

/// Ticker locks held by one mutation. Dropping it releases the locks and
/// forgets tickers nobody else is waiting on.
struct TickerLocks<'a> {
    table: &'a DashMap<String, Arc<Mutex<()>>>,
    held: Vec<(String, OwnedMutexGuard<()>)>,
}

impl Drop for TickerLocks<'_> {
    fn drop(&mut self) {
        for (ticker, guard) in self.held.drain(..) {
            drop(guard);
            self.table.remove_if(&ticker, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}

impl LedgerService {
    pub fn new(
        trade_repository: Arc<dyn TradeRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        mark_prices: Arc<dyn MarkPriceSourceTrait>,
    ) -> Self {
        Self {
            state: Arc::new(LedgerState {
                trade_repository,
                holding_repository,
                ledger_repository,
                mark_prices,
                ticker_locks: DashMap::new(),
                rebuild_lock: RwLock::new(()),
            }),
        }
    }

    /// Runs `op` on a spawned task and waits for its result.
    async fn run_detached<T, F, Fut>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<LedgerState>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        tokio::spawn(op(Arc::clone(&self.state)))
            .await
            .map_err(|e| Error::Unexpected(format!("Ledger task failed: {}", e)))?
    }

    #[cfg(test)]
    pub(crate) fn tracked_ticker_count(&self) -> usize {
        self.state.ticker_locks.len()
    }
}

impl LedgerState {
    /// Locks `tickers` in sorted order so two updates touching the same pair
    /// of tickers cannot deadlock.
    async fn lock_tickers(&self, tickers: &[&str]) -> TickerLocks<'_> {
        let mut ordered = tickers.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut locks = TickerLocks {
            table: &self.ticker_locks,
            held: Vec::with_capacity(ordered.len()),
        };
        for ticker in ordered {
            let lock = self
                .ticker_locks
                .entry(ticker.to_string())
                .or_default()
                .clone();
            locks.held.push((ticker.to_string(), lock.lock_owned().await));
        }
        locks
    }

    /// Fetches a stored trade and locks its ticker plus `extra`.
    ///
    /// The trade is re-read under the lock; if a concurrent update moved it
    /// to another ticker in the meantime, the locks are retaken.
    async fn lock_stored_trade(
        &self,
        trade_id: &str,
        extra: Option<&str>,
    ) -> Result<(Trade, TickerLocks<'_>)> {
        loop {
            let stored = self.require_trade(trade_id)?;
            let mut tickers = vec![stored.ticker.as_str()];
            tickers.extend(extra);
            let locks = self.lock_tickers(&tickers).await;

            let current = self.require_trade(trade_id)?;
            if current.ticker == stored.ticker {
                return Ok((current, locks));
            }
            debug!(
                "Trade {} moved from {} to {} while locking, retrying",
                trade_id, stored.ticker, current.ticker
            );
        }
    }

    fn require_trade(&self, trade_id: &str) -> Result<Trade> {
        self.trade_repository
            .get_trade(trade_id)?
            .ok_or_else(|| Error::NotFound(format!("Trade {} not found", trade_id)))
    }

    fn require_holding(&self, ticker: &str) -> Result<Holding> {
        self.holding_repository.get_holding(ticker)?.ok_or_else(|| {
            warn!("No holding found for {} while reversing a trade", ticker);
            Error::NotFound(format!("Holding for {} not found", ticker))
        })
    }

    fn ensure_sellable(trade: &Trade, holding: Option<&Holding>) -> Result<()> {
        if trade.side == TradeSide::Sell && holding.is_none() {
            warn!("Rejected SELL of {} {}: nothing held", trade.shares, trade.ticker);
            return Err(Error::InvalidTrade(
                "No shares available to sell".to_string(),
            ));
        }
        Ok(())
    }

    async fn add_trade(&self, trade: Trade) -> Result<Trade> {
        let _rebuild = self.rebuild_lock.read().await;
        let _locks = self.lock_tickers(&[trade.ticker.as_str()]).await;

        let existing = self.holding_repository.get_holding(&trade.ticker)?;
        Self::ensure_sellable(&trade, existing.as_ref())?;
        let plan = plan_add(existing.as_ref(), &trade, Utc::now())?;

        let saved = self
            .ledger_repository
            .commit(LedgerCommit {
                trade: TradeWrite::Create(trade),
                holdings: plan,
            })
            .await?
            .ok_or_else(|| Error::Unexpected("Trade store returned no trade".to_string()))?;
        info!(
            "Added {} {} x{} @ {} as trade {}",
            saved.side,
            saved.ticker,
            saved.shares,
            saved.price,
            saved.id_str()
        );
        Ok(saved)
    }

    async fn update_trade(&self, trade_id: &str, trade: Trade) -> Result<Trade> {
        let _rebuild = self.rebuild_lock.read().await;
        let (old_trade, _locks) = self
            .lock_stored_trade(trade_id, Some(trade.ticker.as_str()))
            .await?;

        let old_holding = self.require_holding(&old_trade.ticker)?;
        let new_holding = if trade.ticker == old_trade.ticker {
            None
        } else {
            let other = self.holding_repository.get_holding(&trade.ticker)?;
            Self::ensure_sellable(&trade, other.as_ref())?;
            other
        };

        let updated = trade.with_id(trade_id);
        let plan = plan_update(
            &old_holding,
            &old_trade,
            new_holding.as_ref(),
            &updated,
            Utc::now(),
        )?;

        let saved = self
            .ledger_repository
            .commit(LedgerCommit {
                trade: TradeWrite::Update(updated),
                holdings: plan,
            })
            .await?
            .ok_or_else(|| Error::Unexpected("Trade store returned no trade".to_string()))?;
        info!(
            "Updated trade {}: {} {} x{} -> {} {} x{}",
            trade_id,
            old_trade.side,
            old_trade.ticker,
            old_trade.shares,
            saved.side,
            saved.ticker,
            saved.shares
        );
        Ok(saved)
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<Trade> {
        let _rebuild = self.rebuild_lock.read().await;
        let (trade, _locks) = self.lock_stored_trade(trade_id, None).await?;

        let holding = self.require_holding(&trade.ticker)?;
        let plan = plan_delete(&holding, &trade, Utc::now())?;

        self.ledger_repository
            .commit(LedgerCommit {
                trade: TradeWrite::Delete(trade_id.to_string()),
                holdings: plan,
            })
            .await?;
        info!("Deleted trade {} on {}", trade_id, trade.ticker);
        Ok(trade)
    }

    async fn refresh_holdings(&self) -> Result<Vec<Holding>> {
        let _rebuild = self.rebuild_lock.write().await;
        let trades = self.trade_repository.list_trades()?;
        let holdings = reconcile_all(&trades)?;
        let stored = self
            .holding_repository
            .replace_all_holdings(holdings.clone())
            .await?;
        info!(
            "Rebuilt {} holdings from {} trades",
            stored,
            trades.len()
        );
        Ok(holdings)
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn add_trade(&self, trade: Trade) -> Result<Trade> {
        validate_trade(&trade)?;
        self.run_detached(move |state| async move { state.add_trade(trade).await })
            .await
    }

    async fn update_trade(&self, trade_id: &str, trade: Trade) -> Result<Trade> {
        validate_trade(&trade)?;
        let trade_id = trade_id.to_string();
        self.run_detached(move |state| async move { state.update_trade(&trade_id, trade).await })
            .await
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<Trade> {
        let trade_id = trade_id.to_string();
        self.run_detached(move |state| async move { state.delete_trade(&trade_id).await })
            .await
    }

    fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>> {
        self.state.trade_repository.get_trade(trade_id)
    }

    fn get_trades(&self) -> Result<Vec<Trade>> {
        self.state.trade_repository.list_trades()
    }

    fn get_trades_by_ticker(&self, ticker: &str) -> Result<Vec<Trade>> {
        self.state.trade_repository.list_trades_by_ticker(ticker)
    }

    fn get_holding(&self, ticker: &str) -> Result<Option<Holding>> {
        self.state.holding_repository.get_holding(ticker)
    }

    fn get_holdings(&self) -> Result<Vec<Holding>> {
        self.state.holding_repository.list_holdings()
    }

    fn get_portfolio(&self) -> Result<Vec<PortfolioEntry>> {
        let state = &self.state;
        state
            .holding_repository
            .list_holdings()?
            .into_iter()
            .map(|holding| {
                let trades = state.trade_repository.list_trades_by_ticker(&holding.ticker)?;
                Ok(PortfolioEntry {
                    ticker: holding.ticker,
                    trades,
                })
            })
            .collect()
    }

    async fn refresh_holdings(&self) -> Result<Vec<Holding>> {
        self.run_detached(|state| async move { state.refresh_holdings().await })
            .await
    }

    fn get_returns(&self) -> Result<Option<Decimal>> {
        let holdings = self.state.holding_repository.list_holdings()?;
        total_return(&holdings, self.state.mark_prices.as_ref())
    }
}
