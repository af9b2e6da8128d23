use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row scraped out of the public listing table, untouched: numeric
/// fields still carry thousands separators and currency signs, and the
/// dollar total is still under its source name `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInsiderTrade {
    pub ticker: String,
    pub insider_name: String,
    pub relationship: String,
    pub transaction_date: String,
    pub transaction_type: String,
    pub value: String,
    pub shares: String,
    pub price_per_share: String,
}

/// Canonical disclosed transaction. The natural key is
/// (ticker, insider_name, transaction_date, transaction_type, shares);
/// no single source field is unique per disclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTrade {
    pub ticker: String,
    pub insider_name: String,
    pub relationship: String,
    pub transaction_date: NaiveDate,
    pub transaction_type: String,
    pub transaction_value: Decimal,
    pub shares: i64,
    pub price_per_share: Decimal,
}

/// Database row for the insider_trades table (surrogate id included).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InsiderTradeRow {
    pub id: i64,
    pub ticker: String,
    pub insider_name: String,
    pub relationship: String,
    pub transaction_date: NaiveDate,
    pub transaction_type: String,
    pub transaction_value: Decimal,
    pub shares: i64,
    pub price_per_share: Decimal,
}
