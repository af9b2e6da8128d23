use std::env;
use std::time::Duration;

const DEFAULT_LISTING_URL: &str = "http://openinsider.com/latest-insider-buys";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Brokerage gateway
    pub brokerage_host: String,
    pub brokerage_port: u16,
    pub brokerage_client_id: u32,

    // Insider listing
    pub insider_listing_url: String,
    /// When set, the trade-scan normalizer keeps only records whose
    /// transaction_type equals this value. Unset means no filtering.
    pub insider_transaction_type_filter: Option<String>,

    // Bounded timeouts for external fetches and the upsert commit
    pub fetch_timeout: Duration,
    pub upsert_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: database_url_from_env()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            brokerage_host: env::var("BROKERAGE_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            brokerage_port: env::var("BROKERAGE_PORT")
                .unwrap_or_else(|_| "7497".into())
                .parse()?,
            brokerage_client_id: env::var("BROKERAGE_CLIENT_ID")
                .unwrap_or_else(|_| "1".into())
                .parse()?,

            insider_listing_url: env::var("INSIDER_LISTING_URL")
                .unwrap_or_else(|_| DEFAULT_LISTING_URL.into()),
            insider_transaction_type_filter: env::var("INSIDER_TRANSACTION_TYPE_FILTER")
                .ok()
                .filter(|s| !s.trim().is_empty()),

            fetch_timeout: Duration::from_secs(
                env::var("FETCH_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".into())
                    .parse()
                    .unwrap_or(30),
            ),
            upsert_timeout: Duration::from_secs(
                env::var("UPSERT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".into())
                    .parse()
                    .unwrap_or(30),
            ),
        })
    }

    pub fn brokerage_base_url(&self) -> String {
        format!("http://{}:{}/v1/api", self.brokerage_host, self.brokerage_port)
    }
}

/// Build the Postgres URL from the individual credentials. The store is
/// reached either through a Cloud-SQL-style unix socket instance or a
/// plain TCP host; exactly one of the two must be configured.
fn database_url_from_env() -> anyhow::Result<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let user = require("DATABASE_USER")?;
    let password = require("DATABASE_PASSWORD")?;
    let name = require("DATABASE_NAME")?;

    match (
        env::var("DATABASE_SOCKET_INSTANCE").ok(),
        env::var("DATABASE_HOST").ok(),
    ) {
        (Some(instance), _) => Ok(format!(
            "postgres://{user}:{password}@/{name}?host=/cloudsql/{instance}"
        )),
        (None, Some(host)) => {
            let port = env::var("DATABASE_PORT").unwrap_or_else(|_| "5432".into());
            Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
        }
        (None, None) => Err(anyhow::anyhow!(
            "either DATABASE_SOCKET_INSTANCE or DATABASE_HOST must be set"
        )),
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("{key} must be set"))
}
