//! Radio Browser client library for PMORadio
//!
//! This crate searches the public [Radio Browser](https://www.radio-browser.info)
//! directory and normalizes its records into [`StationCandidate`] values.
//!
//! # Example
//!
//! ```no_run
//! use pmoradiobrowser::{RadioBrowserClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadioBrowserClient::new().await?;
//!     let stations = client.search(&SearchQuery::new("jazz").tag("jazz").limit(5)).await?;
//!     println!("Found {} stations", stations.len());
//!     Ok(())
//! }
//! ```
//!
//! A station's `url` may be a playlist or a redirect: resolve it with
//! `pmostream` before playback unless `url_resolved` is present.

pub mod client;
pub mod error;
pub mod models;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

// Re-exports
pub use client::{ClientBuilder, RadioBrowserClient};
pub use error::{Error, Result};
pub use models::{SearchQuery, StationCandidate};

#[cfg(feature = "pmoconfig")]
pub use config_ext::RadioBrowserConfigExt;
