use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Connector-level failure. An empty result is not an error; connectors
/// report "nothing to fetch" as an empty batch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("source unreachable: {0}")]
    Connection(String),

    #[error("source rejected credentials: {0}")]
    Auth(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status)
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                FetchError::Auth(e.to_string())
            }
            _ => FetchError::Connection(e.to_string()),
        }
    }
}

/// Store-level failure from the upsert engine. A unique violation that
/// survives the ON CONFLICT clause means the upsert statement and the
/// table constraint disagree — a bug, treated as fatal.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("natural-key constraint violated: {0}")]
    Constraint(String),

    #[error("store write failed: {0}")]
    Connection(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return StoreError::Constraint(db.message().to_string());
            }
        }
        StoreError::Connection(e.to_string())
    }
}

/// Terminal failure of one pipeline run. Carries the failing stage's
/// error kind so an external scheduler can decide whether to retry.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Connection(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("normalization failed: {0}")]
    Normalize(String),

    #[error("schema setup failed: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("upsert failed, batch rolled back: {0}")]
    Store(#[from] StoreError),
}

impl From<FetchError> for SyncError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Connection(msg) => SyncError::Connection(msg),
            FetchError::Auth(msg) => SyncError::Auth(msg),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<SyncError> for AppError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Connection(_) | SyncError::Auth(_) => AppError::Upstream(e.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}
