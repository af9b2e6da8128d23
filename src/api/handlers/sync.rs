use axum::extract::State;
use axum::Json;

use super::ApiResponse;
use crate::connectors::{BrokerageConnector, InsiderListingConnector};
use crate::errors::AppError;
use crate::pipeline::{self, RunReport};
use crate::AppState;

/// POST /sync/portfolio — run one synchronous portfolio sync.
/// Connectors are constructed per run; the underlying connections come
/// from the service-owned HTTP client and database pool.
pub async fn sync_portfolio(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RunReport>>, AppError> {
    let connector = BrokerageConnector::new(
        state.http.clone(),
        state.config.brokerage_base_url(),
        state.config.brokerage_client_id,
    );

    let report = pipeline::run_portfolio_sync(&connector, &state.db, &state.config).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /scan/trades — run one synchronous insider-trade scan.
pub async fn scan_trades(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RunReport>>, AppError> {
    let connector = InsiderListingConnector::new(
        state.http.clone(),
        state.config.insider_listing_url.clone(),
    );

    let report = pipeline::run_trade_scan(&connector, &state.db, &state.config).await?;
    Ok(Json(ApiResponse::ok(report)))
}
