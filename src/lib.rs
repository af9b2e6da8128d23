pub mod api;
pub mod config;
pub mod connectors;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod pipeline;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    /// Shared HTTP client; reqwest pools connections internally, so the
    /// per-run connectors stay stateless at the interface.
    pub http: reqwest::Client,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
