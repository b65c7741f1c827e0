use serde::{Deserialize, Serialize};

/// Note attached when the stream was found inside a playlist
pub const NOTE_FROM_PLAYLIST: &str = "Resolved from playlist";

/// Outcome of a stream resolution
///
/// Built once per call and never mutated afterwards. `input_url` is the
/// parsed and normalized form of the caller's URL (surrounding whitespace
/// dropped, empty path written as `/`). `resolved_url` is always a valid
/// absolute URL and equals `input_url` when neither a redirect nor a playlist
/// was involved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionResult {
    pub input_url: String,
    pub resolved_url: String,
    pub content_type: String,
    pub notes: Vec<String>,
}

impl ResolutionResult {
    pub(crate) fn new(
        input_url: &url::Url,
        resolved_url: &url::Url,
        content_type: impl Into<String>,
        notes: Vec<String>,
    ) -> Self {
        Self {
            input_url: input_url.to_string(),
            resolved_url: resolved_url.to_string(),
            content_type: content_type.into(),
            notes,
        }
    }

    /// True when the result came out of a playlist entry
    pub fn from_playlist(&self) -> bool {
        self.notes.iter().any(|n| n == NOTE_FROM_PLAYLIST)
    }

    /// True when the content type matched the audio family
    pub fn is_audio(&self) -> bool {
        crate::content::ContentKind::classify(Some(&self.content_type)).is_audio()
    }
}

/// Fallback note for a content type that never matched audio
pub fn unrecognized_note(content_type: &str) -> String {
    format!(
        "Unrecognized content-type: {}; returning final URL anyway.",
        content_type
    )
}
