//! Error types for stream resolution

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a resolution
///
/// Probe-level failures (HEAD, playlist candidates) never surface here: they
/// are inconclusive and the resolver degrades toward a best-effort answer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not a syntactically valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// DNS, connect or timeout failure on the primary GET
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The primary GET returned an error status
    #[error("HTTP status {status} for {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// Final URL after redirects
        url: String,
    },

    /// Configuration error (from pmoconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl Error {
    /// True for connection-level failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
