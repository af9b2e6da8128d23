pub mod portfolio_sync;
pub mod trade_scan;

pub use portfolio_sync::run_portfolio_sync;
pub use trade_scan::run_trade_scan;

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::Serialize;

use crate::errors::{StoreError, SyncError};

/// Stages of one pipeline run, in execution order. Transitions are
/// strictly sequential; the only stage with external side effects is
/// Upserting, and that stage is atomic per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Fetching,
    Normalizing,
    EnsuringSchema,
    Upserting,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::Fetching => write!(f, "fetching"),
            RunStage::Normalizing => write!(f, "normalizing"),
            RunStage::EnsuringSchema => write!(f, "ensuring_schema"),
            RunStage::Upserting => write!(f, "upserting"),
        }
    }
}

/// Terminal summary of a completed run. A failed run surfaces as
/// `Err(SyncError)` instead, carrying the failing stage's error kind so
/// the external scheduler can decide whether to re-invoke.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub pipeline: &'static str,
    pub records_fetched: usize,
    pub records_written: u64,
    pub message: String,
}

impl RunReport {
    /// "Nothing to sync" is a valid terminal state, not a failure.
    fn empty(pipeline: &'static str) -> Self {
        Self {
            pipeline,
            records_fetched: 0,
            records_written: 0,
            message: "Source returned no records; nothing to sync.".into(),
        }
    }
}

/// Bound the upsert stage: a commit that hangs past the configured
/// deadline surfaces as a connection-class failure.
pub(crate) async fn bounded_upsert<F>(limit: Duration, upsert: F) -> Result<u64, SyncError>
where
    F: Future<Output = Result<u64, StoreError>>,
{
    match tokio::time::timeout(limit, upsert).await {
        Ok(result) => result.map_err(SyncError::from),
        Err(_) => Err(SyncError::Connection(format!(
            "upsert did not complete within {}s",
            limit.as_secs()
        ))),
    }
}

pub(crate) fn observe_run(
    pipeline: &'static str,
    started: Instant,
    result: &Result<RunReport, SyncError>,
) {
    histogram!("pipeline_run_seconds", "pipeline" => pipeline)
        .record(started.elapsed().as_secs_f64());

    match result {
        Ok(report) => {
            counter!("pipeline_runs_total", "pipeline" => pipeline, "outcome" => "done")
                .increment(1);
            counter!("records_written_total", "pipeline" => pipeline)
                .increment(report.records_written);
            tracing::info!(
                pipeline = pipeline,
                fetched = report.records_fetched,
                written = report.records_written,
                "Run finished"
            );
        }
        Err(e) => {
            counter!("pipeline_runs_total", "pipeline" => pipeline, "outcome" => "failed")
                .increment(1);
            tracing::error!(pipeline = pipeline, error = %e, "Run failed");
        }
    }
}
