//! Backend selection and playback launch
//!
//! Two backends exist: the OS default handler, and VLC started as a detached
//! process (optionally with its RC interface on TCP). `auto` picks one from
//! the [`Environment`]:
//!
//! | GUI | VLC | outcome                                        |
//! |-----|-----|------------------------------------------------|
//! | yes | *   | default handler, VLC only if the default fails |
//! | no  | yes | VLC                                            |
//! | no  | no  | failure, nothing launched                      |

use crate::environment::{detect_vlc_path, Environment};
use crate::error::PlayerError;
use crate::launcher::Launcher;
use crate::rc::RcEndpoint;
use crate::scratch::ScratchDir;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub const AUTO_PATH_DEFAULT: &str = "default";
pub const AUTO_PATH_DEFAULT_FORCED: &str = "default (forced)";
pub const AUTO_PATH_DEFAULT_FAILED: &str = "default (failed, no VLC fallback)";
pub const AUTO_PATH_VLC_FORCED: &str = "vlc (forced)";
pub const AUTO_PATH_VLC_FALLBACK: &str = "vlc (fallback after default failed)";
pub const AUTO_PATH_VLC_HEADLESS: &str = "vlc (headless)";
pub const AUTO_PATH_NONE: &str = "none";

pub const NO_BACKEND_ERROR: &str = "No GUI and no player found; cannot play.";

/// Requested playback backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Auto,
    Default,
    Vlc,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "default" => Ok(Self::Default),
            "vlc" => Ok(Self::Vlc),
            other => Err(format!(
                "Unknown backend '{}' (expected auto, default or vlc)",
                other
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Default => "default",
            Self::Vlc => "vlc",
        })
    }
}

/// Backend that actually handled a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    Default,
    Vlc,
}

/// Outcome of a launch attempt
///
/// A failed launch never carries `rc_host`/`rc_port`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PlaybackLaunchResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<PlaybackMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_opened: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_path: Option<String>,
}

impl PlaybackLaunchResult {
    fn with_auto_path(mut self, path: &str) -> Self {
        self.auto_path = Some(path.to_string());
        self
    }
}

/// Options for a VLC launch
#[derive(Debug, Clone, Default)]
pub struct VlcLaunchOptions {
    /// Explicit executable; detected when absent or missing on disk
    pub vlc_path: Option<PathBuf>,
    /// Extra arguments, placed before the RC flags and the URL
    pub extra_args: Vec<String>,
    /// Expose the RC interface on this endpoint
    pub control: Option<RcEndpoint>,
}

/// VLC arguments for `url`: extra args, RC flags, then the URL
pub fn vlc_arguments(url: &str, options: &VlcLaunchOptions) -> Vec<String> {
    let mut args = options.extra_args.clone();
    if let Some(endpoint) = &options.control {
        args.push("--extraintf".to_string());
        args.push("rc".to_string());
        args.push(format!("--rc-host={}", endpoint));
    }
    args.push(url.to_string());
    args
}

/// POSIX shell quoting of one word
pub fn shell_quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c);
    if word.is_empty() {
        "''".to_string()
    } else if word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r#"'"'"'"#))
    }
}

/// Chooses a backend and launches playback
pub struct PlaybackController<E, L> {
    env: E,
    launcher: L,
    scratch: ScratchDir,
    vlc_path: Option<PathBuf>,
    attach_control: Option<RcEndpoint>,
}

impl<E: Environment, L: Launcher> PlaybackController<E, L> {
    pub fn new(env: E, launcher: L) -> Self {
        Self {
            env,
            launcher,
            scratch: ScratchDir::default(),
            vlc_path: None,
            attach_control: None,
        }
    }

    pub fn with_scratch(mut self, scratch: ScratchDir) -> Self {
        self.scratch = scratch;
        self
    }

    /// Default VLC executable for `play` and `play_vlc`
    pub fn with_vlc_path(mut self, vlc_path: Option<PathBuf>) -> Self {
        self.vlc_path = vlc_path;
        self
    }

    /// Launch VLC with RC on `endpoint` whenever `play` picks VLC
    pub fn with_attached_control(mut self, endpoint: Option<RcEndpoint>) -> Self {
        self.attach_control = endpoint;
        self
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Open `url` with the OS default handler
    ///
    /// With `force_playlist`, a scratch `.m3u` wrapping the URL is opened
    /// instead of the URL itself.
    pub fn play_default(&self, url: &str, force_playlist: bool) -> PlaybackLaunchResult {
        let note = if force_playlist {
            "Using .m3u"
        } else {
            "Opened raw URL"
        };

        let target = if force_playlist {
            match self.scratch.write_playlist(url) {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(err) => {
                    warn!(%url, error = %err, "Cannot prepare scratch playlist");
                    return PlaybackLaunchResult {
                        ok: false,
                        mode: Some(PlaybackMode::Default),
                        error: Some(err.to_string()),
                        note: Some(note.to_string()),
                        ..Default::default()
                    };
                }
            }
        } else {
            url.to_string()
        };

        let outcome = self.launcher.open_with_default(&target);
        if let Err(err) = &outcome {
            warn!(%target, error = %err, "Default handler failed");
        } else {
            info!(%target, "Opened with default handler");
        }

        PlaybackLaunchResult {
            ok: outcome.is_ok(),
            mode: Some(PlaybackMode::Default),
            launched: outcome.is_ok().then(|| target.clone()),
            error: outcome.err().map(|e| e.to_string()),
            target_opened: Some(target),
            note: Some(note.to_string()),
            ..Default::default()
        }
    }

    /// Launch VLC on `url`
    pub fn play_vlc(&self, url: &str, options: &VlcLaunchOptions) -> PlaybackLaunchResult {
        let configured = options.vlc_path.as_deref().or(self.vlc_path.as_deref());
        let exe = detect_vlc_path(configured);
        let args = vlc_arguments(url, options);

        match self.launcher.spawn_detached(&exe, &args) {
            Ok(()) => {
                let launched = std::iter::once(exe.to_string_lossy().into_owned())
                    .chain(args.iter().cloned())
                    .map(|w| shell_quote(&w))
                    .collect::<Vec<_>>()
                    .join(" ");
                info!(%launched, "VLC launched");
                PlaybackLaunchResult {
                    ok: true,
                    mode: Some(PlaybackMode::Vlc),
                    launched: Some(launched),
                    rc_host: options.control.as_ref().map(|e| e.host.clone()),
                    rc_port: options.control.as_ref().map(|e| e.port),
                    ..Default::default()
                }
            }
            Err(err) => {
                warn!(exe = %exe.display(), error = %err, "VLC launch failed");
                let message = if err.is_not_found() {
                    PlayerError::PlayerNotFound.to_string()
                } else {
                    err.to_string()
                };
                PlaybackLaunchResult {
                    ok: false,
                    mode: Some(PlaybackMode::Vlc),
                    error: Some(message),
                    ..Default::default()
                }
            }
        }
    }

    /// Play `url` on `backend`, `auto` choosing from the environment
    pub fn play(&self, url: &str, backend: Backend, force_playlist: bool) -> PlaybackLaunchResult {
        let vlc_options = VlcLaunchOptions {
            control: self.attach_control.clone(),
            ..Default::default()
        };

        match backend {
            Backend::Default => self
                .play_default(url, force_playlist)
                .with_auto_path(AUTO_PATH_DEFAULT_FORCED),
            Backend::Vlc => self
                .play_vlc(url, &vlc_options)
                .with_auto_path(AUTO_PATH_VLC_FORCED),
            Backend::Auto => self.play_auto(url, force_playlist, &vlc_options),
        }
    }

    fn play_auto(
        &self,
        url: &str,
        force_playlist: bool,
        vlc_options: &VlcLaunchOptions,
    ) -> PlaybackLaunchResult {
        let has_gui = self.env.has_gui();
        info!(has_gui, "Selecting playback backend");

        if has_gui {
            let result = self.play_default(url, force_playlist);
            if result.ok {
                return result.with_auto_path(AUTO_PATH_DEFAULT);
            }
            if self.env.player_available() {
                return self
                    .play_vlc(url, vlc_options)
                    .with_auto_path(AUTO_PATH_VLC_FALLBACK);
            }
            return result.with_auto_path(AUTO_PATH_DEFAULT_FAILED);
        }

        if self.env.player_available() {
            return self
                .play_vlc(url, vlc_options)
                .with_auto_path(AUTO_PATH_VLC_HEADLESS);
        }

        warn!(%url, "{}", NO_BACKEND_ERROR);
        PlaybackLaunchResult {
            ok: false,
            error: Some(NO_BACKEND_ERROR.to_string()),
            ..Default::default()
        }
        .with_auto_path(AUTO_PATH_NONE)
    }
}
