use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradebook_core::ledger::{LedgerService, LedgerServiceTrait};
use tradebook_core::returns::FixedMarkPriceSource;
use tradebook_storage_sqlite::{
    db::{self, write_actor},
    HoldingRepository, LedgerRepository, TradeRepository,
};

pub struct AppState {
    pub ledger_service: Arc<dyn LedgerServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let trade_repository = Arc::new(TradeRepository::new(pool.clone(), writer.clone()));
    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let ledger_repository = Arc::new(LedgerRepository::new(writer));
    let mark_prices = Arc::new(FixedMarkPriceSource::new(config.mark_price)?);
    tracing::info!("Marking holdings at {}", config.mark_price);

    let ledger_service = Arc::new(LedgerService::new(
        trade_repository,
        holding_repository,
        ledger_repository,
        mark_prices,
    ));

    Ok(Arc::new(AppState { ledger_service }))
}
