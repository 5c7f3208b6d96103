use std::{net::SocketAddr, str::FromStr, time::Duration};

use rust_decimal::Decimal;
use tradebook_core::constants::DEFAULT_MARK_PRICE;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Price every holding is marked at when computing returns.
    pub mark_price: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            db_path: "./db/tradebook.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            mark_price: DEFAULT_MARK_PRICE,
        }
    }
}

impl Config {
    /// Reads `TB_*` variables (after loading `.env`), keeping the default for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = env_parse("TB_LISTEN_ADDR").unwrap_or(defaults.listen_addr);
        let db_path = std::env::var("TB_DB_PATH").unwrap_or(defaults.db_path);
        let cors_allow = std::env::var("TB_CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors_allow);
        let request_timeout = env_parse::<u64>("TB_REQUEST_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_timeout);
        let mark_price = env_parse::<Decimal>("TB_MARK_PRICE")
            .filter(|price| !price.is_sign_negative())
            .unwrap_or(defaults.mark_price);

        Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout,
            mark_price,
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
