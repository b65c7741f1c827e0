//! Station URL → playable stream resolution
//!
//! Resolution is strictly sequential, each step running only when the
//! previous one was inconclusive:
//!
//! 1. `HEAD` probe (short timeout, failures swallowed)
//! 2. `GET` probe following redirects (error status is fatal)
//! 3. playlist extraction and one `GET` on the candidate
//! 4. best-effort fallback on the last final URL
//!
//! Audio bodies are never read: the response is dropped as soon as the
//! headers are classified.

use crate::content::ContentKind;
use crate::error::{Error, Result};
use crate::models::{unrecognized_note, ResolutionResult, NOTE_FROM_PLAYLIST};
use crate::playlist;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default User-Agent sent with every probe
pub const DEFAULT_USER_AGENT: &str = concat!("PMORadio/", env!("CARGO_PKG_VERSION"));

/// Default timeout of the HEAD probe (5 seconds)
pub const DEFAULT_HEAD_TIMEOUT_SECS: u64 = 5;

/// Default timeout of GET requests (20 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Default cap on the playlist body read (64 KiB)
pub const DEFAULT_MAX_PLAYLIST_BYTES: usize = 64 * 1024;

const MAX_REDIRECTS: usize = 10;

/// Resolves station URLs to directly playable audio URLs
#[derive(Debug, Clone)]
pub struct StreamResolver {
    client: Client,
    head_timeout: Duration,
    request_timeout: Duration,
    max_playlist_bytes: usize,
}

impl StreamResolver {
    /// Create a resolver with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the resolver
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// Resolve `url` to a playable stream
    ///
    /// Fails only when `url` is not a valid URL, when the primary `GET`
    /// cannot reach the server, or when it returns an error status. An
    /// unrecognized content type is not a failure: the final URL comes back
    /// with an explanatory note and the caller decides whether to play it.
    pub async fn resolve(&self, url: &str) -> Result<ResolutionResult> {
        let input = Url::parse(url.trim())?;

        if let Some(result) = self.head_probe(&input).await {
            return Ok(result);
        }

        let response = self
            .client
            .get(input.clone())
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().clone();
        if status.is_client_error() || status.is_server_error() {
            warn!(%final_url, status = status.as_u16(), "GET probe failed");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let content_type = content_type_of(&response);
        let kind = ContentKind::classify(content_type.as_deref());
        debug!(%final_url, content_type = ?content_type, ?kind, "GET probe");

        match kind {
            ContentKind::Audio => {
                info!(%input, resolved = %final_url, "Resolved audio stream");
                return Ok(ResolutionResult::new(
                    &input,
                    &final_url,
                    content_type.unwrap_or_default(),
                    Vec::new(),
                ));
            }
            ContentKind::Playlist => {
                if let Some(result) = self.try_playlist(&input, response).await {
                    return Ok(result);
                }
            }
            ContentKind::Other => {}
        }

        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        info!(%input, resolved = %final_url, %content_type, "Returning unresolved URL");
        Ok(ResolutionResult::new(
            &input,
            &final_url,
            content_type.clone(),
            vec![unrecognized_note(&content_type)],
        ))
    }

    /// HEAD probe; `None` means inconclusive
    async fn head_probe(&self, input: &Url) -> Option<ResolutionResult> {
        let response = match self
            .client
            .head(input.clone())
            .timeout(self.head_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!(%input, error = %err, "HEAD probe inconclusive");
                return None;
            }
        };

        if response.status().as_u16() >= 400 {
            debug!(%input, status = response.status().as_u16(), "HEAD probe rejected");
            return None;
        }

        let content_type = content_type_of(&response)?;
        if !ContentKind::classify(Some(&content_type)).is_audio() {
            return None;
        }

        info!(%input, resolved = %response.url(), "Resolved audio stream from HEAD");
        Some(ResolutionResult::new(
            input,
            response.url(),
            content_type,
            Vec::new(),
        ))
    }

    /// Scan a text-like body for a playlist entry and probe it; `None` falls through
    async fn try_playlist(&self, input: &Url, response: Response) -> Option<ResolutionResult> {
        let body = match read_capped(response, self.max_playlist_bytes).await {
            Ok(body) => body,
            Err(err) => {
                warn!(%input, error = %err, "Failed to read playlist body");
                return None;
            }
        };

        let (format, candidate) = playlist::extract_entry(&body)?;
        debug!(%input, ?format, %candidate, "Playlist candidate");

        let candidate_url = match Url::parse(&candidate) {
            Ok(u) => u,
            Err(err) => {
                debug!(%candidate, error = %err, "Playlist candidate is not a URL");
                return None;
            }
        };

        let response = match self
            .client
            .get(candidate_url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(%candidate, error = %err, "Playlist candidate unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(%candidate, status = response.status().as_u16(), "Playlist candidate rejected");
            return None;
        }

        let content_type = content_type_of(&response)?;
        if !ContentKind::classify(Some(&content_type)).is_audio() {
            debug!(%candidate, %content_type, "Playlist candidate is not audio");
            return None;
        }

        info!(%input, resolved = %response.url(), "Resolved audio stream from playlist");
        Some(ResolutionResult::new(
            input,
            response.url(),
            content_type,
            vec![NOTE_FROM_PLAYLIST.to_string()],
        ))
    }
}

fn content_type_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Read at most `limit` bytes of the body
async fn read_capped(mut response: Response, limit: usize) -> reqwest::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
        if buf.len() >= limit {
            debug!(limit, "Playlist body truncated");
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Builder for configuring a StreamResolver
#[derive(Debug)]
pub struct ResolverBuilder {
    client: Option<Client>,
    user_agent: String,
    head_timeout: Duration,
    request_timeout: Duration,
    max_playlist_bytes: usize,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self {
            client: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            head_timeout: Duration::from_secs(DEFAULT_HEAD_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_playlist_bytes: DEFAULT_MAX_PLAYLIST_BYTES,
        }
    }
}

impl ResolverBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client (it must follow redirects)
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the HEAD probe timeout
    pub fn head_timeout(mut self, timeout: Duration) -> Self {
        self.head_timeout = timeout;
        self
    }

    /// Set the GET timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the maximum number of playlist bytes scanned
    pub fn max_playlist_bytes(mut self, bytes: usize) -> Self {
        self.max_playlist_bytes = bytes;
        self
    }

    /// Build the resolver
    pub fn build(self) -> Result<StreamResolver> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(ACCEPT, reqwest::header::HeaderValue::from_static("*/*"));
                Client::builder()
                    .user_agent(&self.user_agent)
                    .default_headers(headers)
                    .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
                    .build()?
            }
        };

        Ok(StreamResolver {
            client,
            head_timeout: self.head_timeout,
            request_timeout: self.request_timeout,
            max_playlist_bytes: self.max_playlist_bytes,
        })
    }
}
