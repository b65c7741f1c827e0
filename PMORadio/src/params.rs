//! Tool parameters
//!
//! Optional fields fall back to the `player` / `radio_browser` configuration
//! sections, whose shipped defaults are `127.0.0.1:4212`, `force_playlist:
//! true` and a search limit of 10.

use pmoplayer::Backend;
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindStationParams {
    #[schemars(description = "Station name (or part of it) to search for")]
    pub query: String,
    #[schemars(description = "Country filter, e.g. \"France\"")]
    pub country: Option<String>,
    #[schemars(description = "Tag filter, e.g. \"jazz\"")]
    pub tag: Option<String>,
    #[schemars(description = "Maximum number of results (default 10)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StreamParams {
    #[schemars(description = "Station or stream URL (raw stream, redirect, .m3u or .pls)")]
    pub url: String,
}

/// Backend choice as exposed to tool callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    #[default]
    Auto,
    Default,
    Vlc,
}

impl From<BackendChoice> for Backend {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Auto => Backend::Auto,
            BackendChoice::Default => Backend::Default,
            BackendChoice::Vlc => Backend::Vlc,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlayParams {
    #[schemars(description = "Stream URL to play")]
    pub url: String,
    #[serde(default)]
    #[schemars(
        description = "auto: default handler on desktops, VLC otherwise or as fallback; default: OS handler only; vlc: VLC only"
    )]
    pub backend: BackendChoice,
    #[schemars(description = "Open a temporary .m3u instead of the raw URL (default true)")]
    pub force_playlist: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlayDefaultParams {
    #[schemars(description = "Stream URL to open")]
    pub url: String,
    #[schemars(description = "Open a temporary .m3u instead of the raw URL (default true)")]
    pub force_playlist: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlayVlcParams {
    #[schemars(description = "Stream URL to play")]
    pub url: String,
    #[schemars(description = "Path to the VLC executable (detected when omitted)")]
    pub vlc_path: Option<String>,
    #[schemars(description = "Extra VLC arguments, e.g. [\"--one-instance\", \"--play-and-exit\"]")]
    pub extra_args: Option<Vec<String>>,
    #[serde(default)]
    #[schemars(description = "Expose VLC's RC interface on rc_host:rc_port")]
    pub with_rc: bool,
    #[schemars(description = "RC interface host (default 127.0.0.1)")]
    pub rc_host: Option<String>,
    #[schemars(description = "RC interface port (default 4212)")]
    pub rc_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RcParams {
    #[schemars(description = "RC interface host (default 127.0.0.1)")]
    pub rc_host: Option<String>,
    #[schemars(description = "RC interface port (default 4212)")]
    pub rc_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VolumeSetParams {
    #[schemars(description = "Volume in percent, clamped to 0..100")]
    pub percent: i64,
    pub rc_host: Option<String>,
    pub rc_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VolumeChangeParams {
    #[schemars(description = "Relative change in percent; positive raises, negative lowers")]
    pub delta: i64,
    pub rc_host: Option<String>,
    pub rc_port: Option<u16>,
}
