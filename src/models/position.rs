use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One holding as reported by the brokerage gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPosition {
    pub symbol: String,
    pub position: f64,
    pub market_price: f64,
    pub market_value: f64,
    pub average_cost: f64,
    #[serde(rename = "unrealizedPNL")]
    pub unrealized_pnl: f64,
    #[serde(rename = "realizedPNL")]
    pub realized_pnl: f64,
    pub account: String,
}

/// Canonical portfolio position; one row per symbol, replaced wholesale
/// on every successful sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub symbol: String,
    pub quantity: i64,
    pub market_price: Decimal,
    pub market_value: Decimal,
    pub average_cost: Decimal,
    pub unrealized_pnl: Decimal,
    pub realized_pnl: Decimal,
    pub account_name: String,
}
