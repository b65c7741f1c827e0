//! Probing the local machine before choosing a playback backend

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bare executable name, resolved through `PATH`
pub const VLC_EXECUTABLE: &str = "vlc";

#[cfg(target_os = "windows")]
const WELL_KNOWN_VLC_PATHS: &[&str] = &[
    r"C:\Program Files\VideoLAN\VLC\vlc.exe",
    r"C:\Program Files (x86)\VideoLAN\VLC\vlc.exe",
];

#[cfg(target_os = "macos")]
const WELL_KNOWN_VLC_PATHS: &[&str] = &["/Applications/VLC.app/Contents/MacOS/VLC"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const WELL_KNOWN_VLC_PATHS: &[&str] = &[];

/// What the backend selector needs to know about the machine
///
/// Queried once per decision; implementations must not cache across calls
/// unless the answer cannot change (e.g. the platform name).
pub trait Environment: Send + Sync {
    /// Whether an interactive desktop session is available
    fn has_gui(&self) -> bool;

    /// Whether the external player can be launched
    fn player_available(&self) -> bool;

    /// Short platform name ("linux", "darwin", "win32", ...)
    fn platform(&self) -> String;

    /// Human readable OS description ("Ubuntu/22.04", ...)
    fn os_description(&self) -> String;
}

/// The real machine
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironment {
    vlc_path: Option<PathBuf>,
}

impl SystemEnvironment {
    pub fn new(vlc_path: Option<PathBuf>) -> Self {
        Self { vlc_path }
    }

    /// Player executable this environment would launch
    pub fn vlc_executable(&self) -> PathBuf {
        detect_vlc_path(self.vlc_path.as_deref())
    }
}

impl Environment for SystemEnvironment {
    fn has_gui(&self) -> bool {
        has_gui_with(std::env::consts::OS, |name| std::env::var_os(name).map(|v| !v.is_empty()))
    }

    fn player_available(&self) -> bool {
        vlc_available(&self.vlc_executable())
    }

    fn platform(&self) -> String {
        pmoutils::platform_name().to_string()
    }

    fn os_description(&self) -> String {
        pmoutils::get_os_string()
    }
}

/// GUI rule: Windows and macOS always have one, other systems need
/// `DISPLAY` or `WAYLAND_DISPLAY`
fn has_gui_with<F>(os: &str, var_is_set: F) -> bool
where
    F: Fn(&str) -> Option<bool>,
{
    match os {
        "windows" | "macos" => true,
        _ => ["DISPLAY", "WAYLAND_DISPLAY"]
            .iter()
            .any(|name| var_is_set(name).unwrap_or(false)),
    }
}

/// Locate the player executable
///
/// A configured path is used when it exists on disk, then the per-OS install
/// locations are tried, and finally the bare name is returned for `PATH`
/// lookup at spawn time.
pub fn detect_vlc_path(configured: Option<&Path>) -> PathBuf {
    detect_vlc_path_in(configured, WELL_KNOWN_VLC_PATHS)
}

fn detect_vlc_path_in(configured: Option<&Path>, candidates: &[&str]) -> PathBuf {
    if let Some(path) = configured.filter(|p| p.exists()) {
        return path.to_path_buf();
    }
    if let Some(path) = configured {
        debug!(path = %path.display(), "Configured VLC path does not exist");
    }

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from(VLC_EXECUTABLE))
}

/// Whether `path` can be launched: it exists, or it is found on `PATH`
pub fn vlc_available(path: &Path) -> bool {
    path.exists() || pmoutils::find_in_path(&path.to_string_lossy()).is_some()
}

/// Snapshot returned by `check_players`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub has_gui: bool,
    pub vlc_available: bool,
    pub platform: String,
    pub os: String,
}

impl EnvironmentReport {
    pub fn probe<E: Environment + ?Sized>(env: &E) -> Self {
        Self {
            has_gui: env.has_gui(),
            vlc_available: env.player_available(),
            platform: env.platform(),
            os: env.os_description(),
        }
    }
}
