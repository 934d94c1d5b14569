//! HTTP transport for snapshots.
//!
//! [`SnapshotFetcher`] is cheap to clone and holds no scene state, so hosts
//! can move it into a background task while the scene stays on their side.

use rescue_events::SimulationSnapshot;
use reqwest::Method;
use std::time::Duration;

use crate::config::{RequestMethod, ServerConfig};
use crate::error::ClientError;

/// Issues snapshot requests against one endpoint.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    http: reqwest::Client,
    endpoint: String,
    method: RequestMethod,
    timeout: Duration,
}

impl SnapshotFetcher {
    /// Creates a fetcher from server settings.
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            method: config.method,
            timeout: config.timeout(),
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches and decodes one snapshot from the configured endpoint.
    pub async fn fetch(&self) -> Result<SimulationSnapshot, ClientError> {
        self.fetch_from(&self.endpoint).await
    }

    /// Fetches and decodes one snapshot from `endpoint`.
    pub async fn fetch_from(&self, endpoint: &str) -> Result<SimulationSnapshot, ClientError> {
        let request = match self.method {
            RequestMethod::Get => self.http.request(Method::GET, endpoint),
            RequestMethod::Post => self.http.request(Method::POST, endpoint).body(""),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_request(endpoint, e))?;

        // Anything outside 2xx, including unfollowed redirects, is a transport failure.
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!("{} returned {}", endpoint, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_request(endpoint, e))?;

        tracing::trace!("Response: {}", String::from_utf8_lossy(&body));

        let snapshot = SimulationSnapshot::from_slice(&body)?;
        tracing::debug!(
            "Fetched snapshot from {} (step {}, {} bytes)",
            endpoint,
            snapshot.current_step,
            body.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fetcher_uses_config() {
        let config = ServerConfig {
            endpoint: "http://127.0.0.1:9/state".into(),
            timeout_secs: 4,
            ..Default::default()
        };

        let fetcher = SnapshotFetcher::new(&config).unwrap();
        assert_eq!(fetcher.endpoint(), "http://127.0.0.1:9/state");
        assert_eq!(fetcher.timeout(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_error() {
        let config = ServerConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };

        let err = SnapshotFetcher::new(&config).unwrap().fetch().await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Transport);
    }
}
