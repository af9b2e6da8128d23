use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::{InsiderTrade, InsiderTradeRow};

/// Apply one scan's worth of disclosed trades as a single transaction.
/// Re-scraping an overlapping window hits the composite natural key and
/// updates the non-key columns (relationship, value, price) in place,
/// so the last observation of a disclosure wins and no rescan ever
/// duplicates a row. Any mid-batch failure rolls the whole batch back.
pub async fn upsert_trades(pool: &PgPool, batch: &[InsiderTrade]) -> Result<u64, StoreError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await.map_err(StoreError::from)?;

    for trade in batch {
        sqlx::query(
            r#"
            INSERT INTO insider_trades
                (ticker, insider_name, relationship, transaction_date,
                 transaction_type, transaction_value, shares, price_per_share)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (ticker, insider_name, transaction_date, transaction_type, shares)
            DO UPDATE SET
                relationship = EXCLUDED.relationship,
                transaction_value = EXCLUDED.transaction_value,
                price_per_share = EXCLUDED.price_per_share
            "#,
        )
        .bind(&trade.ticker)
        .bind(&trade.insider_name)
        .bind(&trade.relationship)
        .bind(trade.transaction_date)
        .bind(&trade.transaction_type)
        .bind(trade.transaction_value)
        .bind(trade.shares)
        .bind(trade.price_per_share)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from)?;
    }

    tx.commit().await.map_err(StoreError::from)?;

    Ok(batch.len() as u64)
}

/// Get all stored trades for a ticker, newest disclosure first.
pub async fn get_trades_by_ticker(
    pool: &PgPool,
    ticker: &str,
) -> Result<Vec<InsiderTradeRow>, sqlx::Error> {
    sqlx::query_as::<_, InsiderTradeRow>(
        "SELECT * FROM insider_trades WHERE ticker = $1 ORDER BY transaction_date DESC, id",
    )
    .bind(ticker)
    .fetch_all(pool)
    .await
}
