//! HTTP client for the Cosmoport ship registry.

use crate::CliResult;
use cosmoport_core::{PageRequest, Ship, ShipDraft, ShipFilter};
use reqwest::{Client, Response};
use serde::Deserialize;

/// Error payload returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Thin wrapper over the `/rest/ships` endpoints.
#[derive(Debug, Clone)]
pub struct ShipClient {
    http: Client,
    base_url: String,
}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Turn a non-success response into an error carrying the server message.
async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|err| err.message)
        .unwrap_or(body);
    Err(format!("server responded {status}: {message}").into())
}

impl ShipClient {
    /// Create a client for the server at `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        Ok(Self {
            http: Client::builder().build()?,
            base_url: normalize_server_url(server_url)?,
        })
    }

    fn ships_url(&self) -> String {
        format!("{}/rest/ships", self.base_url)
    }

    fn ship_url(&self, id: &str) -> String {
        format!("{}/rest/ships/{}", self.base_url, id.trim())
    }

    /// Fetch one page of ships matching `filter`.
    pub async fn list(&self, filter: &ShipFilter, page: &PageRequest) -> CliResult<Vec<Ship>> {
        let response = self
            .http
            .get(self.ships_url())
            .query(filter)
            .query(page)
            .send()
            .await?;
        Ok(check_status(response).await?.json::<Vec<Ship>>().await?)
    }

    /// Count ships matching `filter`.
    pub async fn count(&self, filter: &ShipFilter) -> CliResult<u64> {
        let response = self
            .http
            .get(format!("{}/count", self.ships_url()))
            .query(filter)
            .send()
            .await?;
        Ok(check_status(response).await?.json::<u64>().await?)
    }

    /// Fetch a single ship.
    pub async fn get(&self, id: &str) -> CliResult<Ship> {
        let response = self.http.get(self.ship_url(id)).send().await?;
        Ok(check_status(response).await?.json::<Ship>().await?)
    }

    /// Create a ship from a complete draft.
    pub async fn create(&self, draft: &ShipDraft) -> CliResult<Ship> {
        let response = self.http.post(self.ships_url()).json(draft).send().await?;
        Ok(check_status(response).await?.json::<Ship>().await?)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: &str, patch: &ShipDraft) -> CliResult<Ship> {
        let response = self.http.post(self.ship_url(id)).json(patch).send().await?;
        Ok(check_status(response).await?.json::<Ship>().await?)
    }

    /// Delete a ship.
    pub async fn delete(&self, id: &str) -> CliResult<()> {
        let response = self.http.delete(self.ship_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
