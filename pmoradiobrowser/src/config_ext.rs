//! Extension pour intégrer Radio Browser dans pmoconfig
//!
//! Ce module fournit le trait `RadioBrowserConfigExt` qui ajoute à
//! `pmoconfig::Config` l'accès aux réglages de l'annuaire de stations.
//!
//! ```no_run
//! use pmoconfig::Config;
//! use pmoradiobrowser::{RadioBrowserClient, RadioBrowserConfigExt};
//!
//! # tokio_test::block_on(async {
//! let config = Config::load_config("")?;
//! let client = RadioBrowserClient::from_config(&config).await?;
//! println!("Using mirror {}", client.base_url());
//! # Ok::<(), anyhow::Error>(())
//! # }).unwrap();
//! ```

use crate::client::{RadioBrowserClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::Result as ClientResult;
use crate::models::DEFAULT_SEARCH_LIMIT;
use anyhow::Result;
use pmoconfig::Config;
use std::time::Duration;

/// Trait d'extension pour la configuration Radio Browser
pub trait RadioBrowserConfigExt {
    /// URL de base du miroir Radio Browser
    fn get_radiobrowser_base_url(&self) -> Result<String>;

    /// Définit l'URL de base du miroir
    fn set_radiobrowser_base_url(&self, url: String) -> Result<()>;

    /// Timeout des requêtes de recherche (en secondes)
    fn get_radiobrowser_timeout_secs(&self) -> Result<u64>;

    /// Nombre de résultats par défaut
    fn get_radiobrowser_default_limit(&self) -> Result<u32>;
}

impl RadioBrowserConfigExt for Config {
    fn get_radiobrowser_base_url(&self) -> Result<String> {
        self.get_string_or(&["radio_browser", "base_url"], DEFAULT_BASE_URL)
    }

    fn set_radiobrowser_base_url(&self, url: String) -> Result<()> {
        self.set_optional_string(&["radio_browser", "base_url"], Some(url))
    }

    fn get_radiobrowser_timeout_secs(&self) -> Result<u64> {
        self.get_u64_or(
            &["radio_browser", "timeout_secs"],
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )
    }

    fn get_radiobrowser_default_limit(&self) -> Result<u32> {
        let limit = self.get_u64_or(
            &["radio_browser", "default_limit"],
            DEFAULT_SEARCH_LIMIT as u64,
        )?;
        Ok(u32::try_from(limit).unwrap_or(DEFAULT_SEARCH_LIMIT))
    }
}

impl RadioBrowserClient {
    /// Build a client from the `radio_browser` configuration section
    pub async fn from_config(config: &Config) -> ClientResult<Self> {
        Self::builder()
            .base_url(config.get_radiobrowser_base_url()?)
            .timeout(Duration::from_secs(config.get_radiobrowser_timeout_secs()?))
            .build()
            .await
    }
}
