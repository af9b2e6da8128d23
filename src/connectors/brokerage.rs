use reqwest::Client;
use serde::Deserialize;

use super::Connector;
use crate::errors::FetchError;
use crate::models::RawPosition;

#[derive(Debug, Deserialize)]
struct SessionToken {
    token: String,
}

/// Client for the brokerage gateway's REST surface. Holdings can only be
/// requested inside a session, and the gateway caps concurrent sessions
/// per client id, so every opened session must be closed again on every
/// exit path.
#[derive(Debug, Clone)]
pub struct BrokerageConnector {
    http: Client,
    base_url: String,
    client_id: u32,
}

impl BrokerageConnector {
    pub fn new(http: Client, base_url: String, client_id: u32) -> Self {
        Self {
            http,
            base_url,
            client_id,
        }
    }

    async fn open_session(&self) -> Result<SessionToken, FetchError> {
        let url = format!("{}/session", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "client_id": self.client_id }))
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json().await?)
    }

    async fn request_positions(&self, session: &SessionToken) -> Result<Vec<RawPosition>, FetchError> {
        let url = format!("{}/portfolio/positions", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&session.token)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json().await?)
    }

    async fn close_session(&self, session: &SessionToken) {
        let url = format!("{}/session", self.base_url);
        let result = self
            .http
            .delete(&url)
            .bearer_auth(&session.token)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        if let Err(e) = result {
            // Never mask the fetch outcome with a close failure; the
            // gateway reaps orphaned sessions on its own timeout.
            tracing::warn!(error = %e, "Failed to close brokerage session");
        }
    }
}

impl Connector for BrokerageConnector {
    type Record = RawPosition;

    /// Open a session, request current holdings, and close the session
    /// whether or not the request succeeded.
    async fn fetch(&self) -> Result<Vec<RawPosition>, FetchError> {
        let session = self.open_session().await?;
        let result = self.request_positions(&session).await;
        self.close_session(&session).await;
        result
    }
}
