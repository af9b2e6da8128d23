use std::time::Instant;

use sqlx::PgPool;

use super::{bounded_upsert, observe_run, RunReport, RunStage};
use crate::config::AppConfig;
use crate::connectors::Connector;
use crate::db::{insider_trade_repo, schema};
use crate::errors::SyncError;
use crate::models::RawInsiderTrade;
use crate::normalize;

const PIPELINE: &str = "trade_scan";

/// One full trade scan: scrape the public listing, normalize the rows,
/// apply the optional transaction-type filter, and merge the batch into
/// the store keyed on the composite disclosure identity. Overlapping
/// scan windows converge instead of duplicating.
pub async fn run_trade_scan<C>(
    connector: &C,
    pool: &PgPool,
    config: &AppConfig,
) -> Result<RunReport, SyncError>
where
    C: Connector<Record = RawInsiderTrade>,
{
    let started = Instant::now();
    let result = execute(connector, pool, config).await;
    observe_run(PIPELINE, started, &result);
    result
}

async fn execute<C>(
    connector: &C,
    pool: &PgPool,
    config: &AppConfig,
) -> Result<RunReport, SyncError>
where
    C: Connector<Record = RawInsiderTrade>,
{
    tracing::info!(stage = %RunStage::Fetching, "Fetching insider-trade listing");
    let raw = connector.fetch().await?;

    if raw.is_empty() {
        tracing::info!("Listing yielded no trades");
        return Ok(RunReport::empty(PIPELINE));
    }

    tracing::info!(stage = %RunStage::Normalizing, records = raw.len(), "Normalizing trades");
    let normalized = raw
        .iter()
        .map(normalize::canonical_trade)
        .collect::<Result<Vec<_>, _>>()?;

    let filter = config.insider_transaction_type_filter.as_deref();
    let batch = normalize::apply_type_filter(normalized, filter);
    if let Some(wanted) = filter {
        tracing::info!(
            transaction_type = wanted,
            kept = batch.len(),
            "Applied transaction-type filter"
        );
    }

    tracing::info!(stage = %RunStage::EnsuringSchema, "Ensuring insider_trades table");
    schema::ensure_insider_trades_schema(pool)
        .await
        .map_err(SyncError::Schema)?;

    tracing::info!(stage = %RunStage::Upserting, records = batch.len(), "Applying batch");
    let written = bounded_upsert(
        config.upsert_timeout,
        insider_trade_repo::upsert_trades(pool, &batch),
    )
    .await?;

    Ok(RunReport {
        pipeline: PIPELINE,
        records_fetched: raw.len(),
        records_written: written,
        message: "Trade scanning and storing completed successfully.".into(),
    })
}
