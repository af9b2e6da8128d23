//! Operational endpoints: readiness probe and the metrics scrape.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::AppState;

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    database: bool,
    portfolio_table: bool,
    insider_trades_table: bool,
}

/// GET /health — store reachability plus whether each pipeline's
/// destination table exists yet. A missing table is reported but does
/// not fail the probe: each pipeline creates its own table on first run.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    let (portfolio_table, insider_trades_table) = if database {
        (
            table_exists(&state.db, "portfolio").await,
            table_exists(&state.db, "insider_trades").await,
        )
    } else {
        (false, false)
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthReport {
            status: if database { "healthy" } else { "unhealthy" },
            database,
            portfolio_table,
            insider_trades_table,
        }),
    )
}

async fn table_exists(pool: &PgPool, table: &str) -> bool {
    sqlx::query_scalar::<_, Option<String>>("SELECT to_regclass($1)::text")
        .bind(table)
        .fetch_one(pool)
        .await
        .ok()
        .flatten()
        .is_some()
}

/// GET /metrics — Prometheus scrape payload.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics_handle.render(),
    )
}
