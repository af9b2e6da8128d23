use std::time::Instant;

use sqlx::PgPool;

use super::{bounded_upsert, observe_run, RunReport, RunStage};
use crate::config::AppConfig;
use crate::connectors::Connector;
use crate::db::{portfolio_repo, schema};
use crate::errors::SyncError;
use crate::models::RawPosition;
use crate::normalize;

const PIPELINE: &str = "portfolio_sync";

/// One full portfolio sync: fetch current holdings from the brokerage,
/// normalize them, and replace the stored state per symbol. Symbols
/// absent from this sync keep their prior row.
pub async fn run_portfolio_sync<C>(
    connector: &C,
    pool: &PgPool,
    config: &AppConfig,
) -> Result<RunReport, SyncError>
where
    C: Connector<Record = RawPosition>,
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
    C: Connector<Record = RawPosition>,
{
    tracing::info!(stage = %RunStage::Fetching, "Requesting current holdings");
    let raw = connector.fetch().await?;

    if raw.is_empty() {
        tracing::info!("Brokerage reported no holdings");
        return Ok(RunReport::empty(PIPELINE));
    }

    tracing::info!(stage = %RunStage::Normalizing, records = raw.len(), "Normalizing holdings");
    let batch = raw
        .iter()
        .map(normalize::canonical_position)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(stage = %RunStage::EnsuringSchema, "Ensuring portfolio table");
    schema::ensure_portfolio_schema(pool)
        .await
        .map_err(SyncError::Schema)?;

    tracing::info!(stage = %RunStage::Upserting, records = batch.len(), "Applying batch");
    let written = bounded_upsert(
        config.upsert_timeout,
        portfolio_repo::upsert_positions(pool, &batch),
    )
    .await?;

    Ok(RunReport {
        pipeline: PIPELINE,
        records_fetched: raw.len(),
        records_written: written,
        message: "Portfolio updated successfully.".into(),
    })
}
