//! Extension pour intégrer la lecture locale dans pmoconfig
//!
//! Ce module fournit le trait `PlayerConfigExt` qui lit la section `player`
//! de la configuration.

use crate::backend::PlaybackController;
use crate::environment::SystemEnvironment;
use crate::launcher::SystemLauncher;
use crate::SystemPlaybackController;
use crate::rc::{RcClient, RcEndpoint, DEFAULT_CONTROL_TIMEOUT, DEFAULT_RC_HOST, DEFAULT_RC_PORT};
use crate::scratch::{ScratchDir, DEFAULT_SCRATCH_TTL};
use anyhow::{anyhow, Result};
use pmoconfig::Config;
use std::path::PathBuf;
use std::time::Duration;

/// Trait d'extension pour la configuration du lecteur
pub trait PlayerConfigExt {
    /// Chemin explicite de l'exécutable VLC (`None` = détection automatique)
    fn get_player_vlc_path(&self) -> Result<Option<PathBuf>>;

    /// Définit le chemin de VLC
    fn set_player_vlc_path(&self, path: Option<PathBuf>) -> Result<()>;

    /// Lancer VLC avec l'interface RC depuis `play`
    fn get_player_attach_control(&self) -> Result<bool>;

    fn set_player_attach_control(&self, enabled: bool) -> Result<()>;

    /// Point d'accès RC par défaut
    fn get_player_rc_endpoint(&self) -> Result<RcEndpoint>;

    /// Timeout des échanges RC
    fn get_player_control_timeout(&self) -> Result<Duration>;

    /// Ouvrir une playlist .m3u plutôt que l'URL brute
    fn get_player_force_playlist(&self) -> Result<bool>;

    /// Répertoire des playlists temporaires
    fn get_player_scratch_dir(&self) -> Result<PathBuf>;

    /// Durée de vie des playlists temporaires
    fn get_player_scratch_ttl(&self) -> Result<Duration>;
}

impl PlayerConfigExt for Config {
    fn get_player_vlc_path(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .get_optional_string(&["player", "vlc_path"])?
            .map(PathBuf::from))
    }

    fn set_player_vlc_path(&self, path: Option<PathBuf>) -> Result<()> {
        self.set_optional_string(
            &["player", "vlc_path"],
            path.map(|p| p.to_string_lossy().into_owned()),
        )
    }

    fn get_player_attach_control(&self) -> Result<bool> {
        self.get_bool_or(&["player", "attach_control"], false)
    }

    fn set_player_attach_control(&self, enabled: bool) -> Result<()> {
        self.set_bool(&["player", "attach_control"], enabled)
    }

    fn get_player_rc_endpoint(&self) -> Result<RcEndpoint> {
        let host = self.get_string_or(&["player", "rc_host"], DEFAULT_RC_HOST)?;
        let port = self.get_u64_or(&["player", "rc_port"], DEFAULT_RC_PORT as u64)?;
        let port = u16::try_from(port).map_err(|_| anyhow!("Invalid player.rc_port: {}", port))?;
        Ok(RcEndpoint::new(host, port))
    }

    fn get_player_control_timeout(&self) -> Result<Duration> {
        let millis = self.get_u64_or(
            &["player", "control_timeout_ms"],
            DEFAULT_CONTROL_TIMEOUT.as_millis() as u64,
        )?;
        Ok(Duration::from_millis(millis))
    }

    fn get_player_force_playlist(&self) -> Result<bool> {
        self.get_bool_or(&["player", "force_playlist"], true)
    }

    fn get_player_scratch_dir(&self) -> Result<PathBuf> {
        Ok(self
            .get_optional_string(&["player", "scratch", "directory"])?
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir))
    }

    fn get_player_scratch_ttl(&self) -> Result<Duration> {
        let secs = self.get_u64_or(
            &["player", "scratch", "ttl_secs"],
            DEFAULT_SCRATCH_TTL.as_secs(),
        )?;
        Ok(Duration::from_secs(secs))
    }
}

impl SystemPlaybackController {
    /// Controller for the real machine, configured from the `player` section
    pub fn from_config(config: &Config) -> Result<Self> {
        let vlc_path = config.get_player_vlc_path()?;
        let attach = if config.get_player_attach_control()? {
            Some(config.get_player_rc_endpoint()?)
        } else {
            None
        };
        let scratch = ScratchDir::new(
            config.get_player_scratch_dir()?,
            config.get_player_scratch_ttl()?,
        );

        Ok(
            PlaybackController::new(SystemEnvironment::new(vlc_path.clone()), SystemLauncher)
                .with_scratch(scratch)
                .with_vlc_path(vlc_path)
                .with_attached_control(attach),
        )
    }
}

impl RcClient {
    /// Client for `endpoint` with the configured timeout
    pub fn from_config(config: &Config, endpoint: RcEndpoint) -> Result<Self> {
        Ok(RcClient::new(endpoint).with_timeout(config.get_player_control_timeout()?))
    }
}
