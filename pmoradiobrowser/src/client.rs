//! HTTP client for the Radio Browser API
//!
//! # Example
//!
//! ```no_run
//! use pmoradiobrowser::{RadioBrowserClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadioBrowserClient::new().await?;
//!
//!     let stations = client.search(&SearchQuery::new("fip").country("France")).await?;
//!     for station in &stations {
//!         println!("{} -> {:?}", station.display_name(), station.playable_url());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{RawStation, SearchQuery, StationCandidate};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Radio Browser mirror
pub const DEFAULT_BASE_URL: &str = "https://de1.api.radio-browser.info";

/// Default timeout for HTTP requests (15 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("PMORadio/", env!("CARGO_PKG_VERSION"), " (pmoradiobrowser)");

/// Radio Browser HTTP client
///
/// The client is stateless and does not cache responses.
#[derive(Debug, Clone)]
pub struct RadioBrowserClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RadioBrowserClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, query: &SearchQuery) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/json/stations/search",
            self.base_url.trim_end_matches('/')
        ))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// Search the directory for stations
    ///
    /// Callers should prefer [`StationCandidate::playable_url`] and pass it
    /// through the stream resolver when unsure it is a raw audio stream.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<StationCandidate>> {
        let url = self.search_url(query)?;
        debug!(%url, "Searching stations");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        let raw: Vec<RawStation> = response.json().await?;
        let stations: Vec<StationCandidate> = raw.into_iter().map(StationCandidate::from).collect();

        debug!(query = %query.name, count = stations.len(), "Station search done");
        Ok(stations)
    }
}

/// Builder for configuring a RadioBrowserClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base URL (a Radio Browser mirror)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub async fn build(self) -> Result<RadioBrowserClient> {
        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::other(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        Ok(RadioBrowserClient {
            client,
            base_url: self.base_url,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert!(builder.user_agent.starts_with("PMORadio/"));
        assert!(builder.proxy.is_none());
    }

    #[tokio::test]
    async fn test_search_url_encodes_parameters() {
        let client = RadioBrowserClient::builder()
            .base_url("http://localhost:1234/")
            .build()
            .await
            .unwrap();

        let url = client
            .search_url(&SearchQuery::new("radio nova").country("France").limit(5))
            .unwrap();
        assert_eq!(url.path(), "/json/stations/search");
        assert_eq!(url.query(), Some("name=radio+nova&limit=5&country=France"));
    }

    #[tokio::test]
    async fn test_invalid_proxy_is_rejected() {
        let result = RadioBrowserClient::builder()
            .proxy("not a proxy url")
            .build()
            .await;
        assert!(result.is_err());
    }

    // ========================================================================
    // Integration Tests (real API calls)
    //
    // Run with: cargo test -p pmoradiobrowser -- --ignored
    // ========================================================================

    #[tokio::test]
    #[ignore = "Integration test - calls real Radio Browser API"]
    async fn test_search_real_directory() {
        let client = RadioBrowserClient::new()
            .await
            .expect("Failed to create client");
        let stations = client
            .search(&SearchQuery::new("fip").limit(5))
            .await
            .expect("Search failed");

        assert!(stations.len() <= 5);
        for station in &stations {
            println!("{} -> {:?}", station.display_name(), station.playable_url());
        }
    }
}
