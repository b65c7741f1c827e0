//! Error types for playback launch

use std::io;

/// Result type alias for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Errors raised while preparing or launching playback
///
/// These never cross the tool boundary as errors: the controller folds them
/// into an `ok: false` launch result.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The player executable could not be found
    #[error("VLC not found. Install VLC or provide vlc_path.")]
    PlayerNotFound,

    /// A process could not be spawned
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The scratch playlist could not be written
    #[error("Failed to write scratch playlist: {0}")]
    Scratch(#[from] io::Error),
}

impl PlayerError {
    pub(crate) fn launch(program: impl Into<String>, source: io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }

    /// True when the failure means the executable does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::PlayerNotFound => true,
            Self::Launch { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
