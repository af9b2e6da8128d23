use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first run.
    for pipeline in ["portfolio_sync", "trade_scan"] {
        counter!("pipeline_runs_total", "pipeline" => pipeline, "outcome" => "done").absolute(0);
        counter!("pipeline_runs_total", "pipeline" => pipeline, "outcome" => "failed").absolute(0);
        counter!("records_written_total", "pipeline" => pipeline).absolute(0);

        // Histogram is lazily created on first record; force creation.
        histogram!("pipeline_run_seconds", "pipeline" => pipeline).record(0.0);
    }

    handle
}
