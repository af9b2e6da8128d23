//! Pure mapping from raw source records to canonical, storage-ready
//! records: static field renames, numeric/date coercion, and the
//! optional transaction-type filter for the trade-scan domain.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::SyncError;
use crate::models::{InsiderTrade, Position, RawInsiderTrade, RawPosition};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("field {field} has unparseable number {value:?}")]
    Number { field: &'static str, value: String },

    #[error("field {field} has unparseable date {value:?}")]
    Date { field: &'static str, value: String },
}

impl From<NormalizeError> for SyncError {
    fn from(e: NormalizeError) -> Self {
        SyncError::Normalize(e.to_string())
    }
}

/// Map one brokerage holding into a canonical position. The gateway's
/// `account` field lands under `account_name`; money fields become
/// exact decimals.
pub fn canonical_position(raw: &RawPosition) -> Result<Position, NormalizeError> {
    Ok(Position {
        symbol: raw.symbol.trim().to_string(),
        quantity: raw.position.round() as i64,
        market_price: decimal_from_f64("market_price", raw.market_price)?,
        market_value: decimal_from_f64("market_value", raw.market_value)?,
        average_cost: decimal_from_f64("average_cost", raw.average_cost)?,
        unrealized_pnl: decimal_from_f64("unrealized_pnl", raw.unrealized_pnl)?,
        realized_pnl: decimal_from_f64("realized_pnl", raw.realized_pnl)?,
        account_name: raw.account.trim().to_string(),
    })
}

/// Map one scraped listing row into a canonical trade. The source's
/// `value` column collides with a SQL reserved word and is renamed to
/// `transaction_value` here, once, for the whole system.
pub fn canonical_trade(raw: &RawInsiderTrade) -> Result<InsiderTrade, NormalizeError> {
    Ok(InsiderTrade {
        ticker: raw.ticker.trim().to_string(),
        insider_name: raw.insider_name.trim().to_string(),
        relationship: raw.relationship.trim().to_string(),
        transaction_date: parse_date("transaction_date", &raw.transaction_date)?,
        transaction_type: raw.transaction_type.trim().to_string(),
        transaction_value: parse_decimal("value", &raw.value)?,
        shares: parse_count("shares", &raw.shares)?,
        price_per_share: parse_decimal("price_per_share", &raw.price_per_share)?,
    })
}

/// Optional transaction-type restriction, driven by configuration.
/// Unset means every scraped record passes through.
pub fn apply_type_filter(trades: Vec<InsiderTrade>, filter: Option<&str>) -> Vec<InsiderTrade> {
    match filter {
        Some(wanted) => trades
            .into_iter()
            .filter(|t| t.transaction_type == wanted)
            .collect(),
        None => trades,
    }
}

fn decimal_from_f64(field: &'static str, value: f64) -> Result<Decimal, NormalizeError> {
    Decimal::try_from(value).map_err(|_| NormalizeError::Number {
        field,
        value: value.to_string(),
    })
}

/// Parse numeric text as scraped: thousands separators, currency signs,
/// and leading plus signs are noise.
fn parse_decimal(field: &'static str, text: &str) -> Result<Decimal, NormalizeError> {
    strip_numeric_noise(text)
        .parse()
        .map_err(|_| NormalizeError::Number {
            field,
            value: text.to_string(),
        })
}

fn parse_count(field: &'static str, text: &str) -> Result<i64, NormalizeError> {
    strip_numeric_noise(text)
        .parse()
        .map_err(|_| NormalizeError::Number {
            field,
            value: text.to_string(),
        })
}

fn parse_date(field: &'static str, text: &str) -> Result<NaiveDate, NormalizeError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| NormalizeError::Date {
        field,
        value: text.to_string(),
    })
}

fn strip_numeric_noise(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '+'))
        .collect()
}
