//! Content-Type classification

/// What a `Content-Type` header says about a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Directly playable audio (`audio/*`, `application/ogg`)
    Audio,
    /// Text-like body worth scanning for a playlist entry
    Playlist,
    /// Anything else, including a missing header
    Other,
}

impl ContentKind {
    /// Classify a raw `Content-Type` header value
    ///
    /// Parameters (`; charset=...`) are ignored and matching is
    /// case-insensitive. The audio check runs first, so playlist MIME types
    /// under `audio/` (e.g. `audio/x-mpegurl`) count as audio.
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(raw) = content_type else {
            return Self::Other;
        };
        let essence = mime_essence(raw);

        if essence.starts_with("audio/") || essence == "application/ogg" {
            Self::Audio
        } else if essence.starts_with("text/") || essence.contains("mpegurl") || essence.contains("pls") {
            Self::Playlist
        } else {
            Self::Other
        }
    }

    pub fn is_audio(self) -> bool {
        self == Self::Audio
    }
}

/// `type/subtype` part of a media type, lower-cased
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_family() {
        for ct in [
            "audio/mpeg",
            "audio/aac",
            "Audio/MPEG",
            "audio/mpeg; charset=binary",
            "application/ogg",
            "audio/x-mpegurl",
        ] {
            assert_eq!(ContentKind::classify(Some(ct)), ContentKind::Audio, "{}", ct);
        }
    }

    #[test]
    fn test_playlist_family() {
        for ct in [
            "text/plain",
            "text/html; charset=utf-8",
            "application/vnd.apple.mpegurl",
            "application/x-mpegurl",
            "application/pls+xml",
        ] {
            assert_eq!(ContentKind::classify(Some(ct)), ContentKind::Playlist, "{}", ct);
        }
    }

    #[test]
    fn test_other() {
        assert_eq!(ContentKind::classify(None), ContentKind::Other);
        assert_eq!(ContentKind::classify(Some("")), ContentKind::Other);
        assert_eq!(
            ContentKind::classify(Some("application/octet-stream")),
            ContentKind::Other
        );
        assert_eq!(
            ContentKind::classify(Some("application/oggx")),
            ContentKind::Other
        );
    }
}
