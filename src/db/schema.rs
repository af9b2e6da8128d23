//! Destination-table setup. Both statements are conditional creates:
//! safe to issue on every run, a no-op once the table exists, and never
//! touching existing rows. The natural-key uniqueness constraint is
//! declared at creation time and is immutable afterwards; changing it
//! is an out-of-band migration, not a runtime concern.

use sqlx::PgPool;

/// Ensure the portfolio table exists. Natural key: symbol.
pub async fn ensure_portfolio_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS portfolio (
            symbol VARCHAR(255) PRIMARY KEY,
            quantity BIGINT NOT NULL,
            market_price NUMERIC NOT NULL,
            market_value NUMERIC NOT NULL,
            average_cost NUMERIC NOT NULL,
            unrealized_pnl NUMERIC NOT NULL,
            realized_pnl NUMERIC NOT NULL,
            account_name VARCHAR(255) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Ensure the insider_trades table exists. No single source field is
/// unique per disclosed transaction, so the natural key is the
/// composite (ticker, insider_name, transaction_date, transaction_type,
/// shares); the surrogate id exists only for row addressing.
pub async fn ensure_insider_trades_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS insider_trades (
            id BIGSERIAL PRIMARY KEY,
            ticker VARCHAR(255) NOT NULL,
            insider_name VARCHAR(255) NOT NULL,
            relationship VARCHAR(255) NOT NULL,
            transaction_date DATE NOT NULL,
            transaction_type VARCHAR(255) NOT NULL,
            transaction_value NUMERIC NOT NULL,
            shares BIGINT NOT NULL,
            price_per_share NUMERIC NOT NULL,
            CONSTRAINT insider_trades_natural_key UNIQUE
                (ticker, insider_name, transaction_date, transaction_type, shares)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
