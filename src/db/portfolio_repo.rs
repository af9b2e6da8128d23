use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::Position;

/// Apply one sync's worth of positions as a single transaction: insert
/// each position, overwriting all non-key columns when the symbol is
/// already present. Any mid-batch failure drops the transaction and
/// leaves the table exactly as it was.
pub async fn upsert_positions(pool: &PgPool, batch: &[Position]) -> Result<u64, StoreError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await.map_err(StoreError::from)?;

    for position in batch {
        sqlx::query(
            r#"
            INSERT INTO portfolio
                (symbol, quantity, market_price, market_value, average_cost,
                 unrealized_pnl, realized_pnl, account_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (symbol) DO UPDATE SET
                quantity = EXCLUDED.quantity,
                market_price = EXCLUDED.market_price,
                market_value = EXCLUDED.market_value,
                average_cost = EXCLUDED.average_cost,
                unrealized_pnl = EXCLUDED.unrealized_pnl,
                realized_pnl = EXCLUDED.realized_pnl,
                account_name = EXCLUDED.account_name
            "#,
        )
        .bind(&position.symbol)
        .bind(position.quantity)
        .bind(position.market_price)
        .bind(position.market_value)
        .bind(position.average_cost)
        .bind(position.unrealized_pnl)
        .bind(position.realized_pnl)
        .bind(&position.account_name)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from)?;
    }

    tx.commit().await.map_err(StoreError::from)?;

    Ok(batch.len() as u64)
}

/// Get a single position by symbol.
pub async fn get_position(pool: &PgPool, symbol: &str) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>("SELECT * FROM portfolio WHERE symbol = $1")
        .bind(symbol)
        .fetch_optional(pool)
        .await
}
