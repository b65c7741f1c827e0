//! Extension pour intégrer le résolveur de flux dans pmoconfig
//!
//! Réglages lus dans la section `resolver` :
//!
//! ```yaml
//! resolver:
//!   head_timeout_secs: 5
//!   request_timeout_secs: 20
//!   max_playlist_bytes: 65536
//! ```

use crate::error::Result as ResolveResult;
use crate::resolver::{
    StreamResolver, DEFAULT_HEAD_TIMEOUT_SECS, DEFAULT_MAX_PLAYLIST_BYTES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use anyhow::Result;
use pmoconfig::Config;
use std::time::Duration;

/// Trait d'extension pour la configuration du résolveur
pub trait StreamConfigExt {
    /// Timeout de la sonde HEAD (en secondes)
    fn get_resolver_head_timeout_secs(&self) -> Result<u64>;

    /// Timeout des requêtes GET (en secondes)
    fn get_resolver_request_timeout_secs(&self) -> Result<u64>;

    /// Définit le timeout des requêtes GET
    fn set_resolver_request_timeout_secs(&self, secs: u64) -> Result<()>;

    /// Taille maximale lue dans une playlist
    fn get_resolver_max_playlist_bytes(&self) -> Result<usize>;
}

impl StreamConfigExt for Config {
    fn get_resolver_head_timeout_secs(&self) -> Result<u64> {
        self.get_u64_or(&["resolver", "head_timeout_secs"], DEFAULT_HEAD_TIMEOUT_SECS)
    }

    fn get_resolver_request_timeout_secs(&self) -> Result<u64> {
        self.get_u64_or(
            &["resolver", "request_timeout_secs"],
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )
    }

    fn set_resolver_request_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_u64(&["resolver", "request_timeout_secs"], secs)
    }

    fn get_resolver_max_playlist_bytes(&self) -> Result<usize> {
        let bytes = self.get_u64_or(
            &["resolver", "max_playlist_bytes"],
            DEFAULT_MAX_PLAYLIST_BYTES as u64,
        )?;
        Ok(usize::try_from(bytes).unwrap_or(DEFAULT_MAX_PLAYLIST_BYTES))
    }
}

impl StreamResolver {
    /// Build a resolver from the `resolver` configuration section
    pub fn from_config(config: &Config) -> ResolveResult<Self> {
        Self::builder()
            .head_timeout(Duration::from_secs(config.get_resolver_head_timeout_secs()?))
            .request_timeout(Duration::from_secs(
                config.get_resolver_request_timeout_secs()?,
            ))
            .max_playlist_bytes(config.get_resolver_max_playlist_bytes()?)
            .build()
    }
}
