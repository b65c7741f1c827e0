//! Local playback for PMORadio
//!
//! - [`PlaybackController`] picks a backend (OS default handler or VLC) and
//!   launches it without keeping any handle on the child process.
//! - [`RcClient`] / [`send_rc_commands`] drive a VLC instance started with
//!   `--extraintf rc` over its TCP remote-control interface.
//!
//! Environment probing and process launches sit behind the [`Environment`]
//! and [`Launcher`] traits so the selection logic can be exercised without a
//! desktop or a VLC install.

pub mod backend;
pub mod environment;
pub mod error;
pub mod launcher;
pub mod rc;
pub mod scratch;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use backend::{
    Backend, PlaybackController, PlaybackLaunchResult, PlaybackMode, VlcLaunchOptions,
};
pub use environment::{
    detect_vlc_path, vlc_available, Environment, EnvironmentReport, SystemEnvironment,
};
pub use error::{PlayerError, Result};
pub use launcher::{Launcher, SystemLauncher};
pub use rc::{send_rc_commands, ControlResponse, RcClient, RcEndpoint};
pub use scratch::ScratchDir;

#[cfg(feature = "pmoconfig")]
pub use config_ext::PlayerConfigExt;

/// Controller wired to the real machine
pub type SystemPlaybackController = PlaybackController<SystemEnvironment, SystemLauncher>;
