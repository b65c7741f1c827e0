//! Permissive M3U / PLS stream extraction
//!
//! Real-world playlists vary wildly, so this is a line scanner rather than a
//! grammar: PLS `FileN=` entries are looked for first, then bare M3U URLs.

/// Playlist dialect an entry was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistFormat {
    Pls,
    M3u,
}

/// Extract the first stream URL of a playlist body
///
/// Equivalent to [`extract_entry`] without the dialect.
pub fn extract_stream_url(body: &str) -> Option<String> {
    extract_entry(body).map(|(_, url)| url)
}

/// Extract the first stream URL of a playlist body, with its dialect
///
/// Any PLS entry wins over any M3U entry, whatever their position in the
/// body.
pub fn extract_entry(body: &str) -> Option<(PlaylistFormat, String)> {
    let lines: Vec<&str> = body
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let pls = lines.iter().find_map(|line| {
        let is_file_key = line
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("file"));
        if !is_file_key {
            return None;
        }
        let (_, value) = line.split_once('=')?;
        let value = value.trim();
        value.starts_with("http").then(|| value.to_string())
    });
    if let Some(url) = pls {
        return Some((PlaylistFormat::Pls, url));
    }

    lines
        .iter()
        .find(|line| !line.starts_with('#') && line.starts_with("http"))
        .map(|line| (PlaylistFormat::M3u, line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pls_entry() {
        let body = "[playlist]\nNumberOfEntries=2\nFile1=http://a.example/stream\nTitle1=A\nFile2=http://b.example/stream\nLength1=-1\nVersion=2\n";
        assert_eq!(
            extract_entry(body),
            Some((PlaylistFormat::Pls, "http://a.example/stream".to_string()))
        );
    }

    #[test]
    fn test_pls_wins_over_earlier_m3u_line() {
        let body = "http://m3u.example/first\nfile1 = https://pls.example/second\n";
        assert_eq!(
            extract_entry(body),
            Some((PlaylistFormat::Pls, "https://pls.example/second".to_string()))
        );
    }

    #[test]
    fn test_pls_key_is_case_insensitive_and_value_must_be_http() {
        let body = "FILE1=rtsp://nope.example/x\nfile2=HTTP://upper.example\nFile3=http://ok.example/s\n";
        assert_eq!(
            extract_stream_url(body),
            Some("http://ok.example/s".to_string())
        );
    }

    #[test]
    fn test_m3u_skips_comments_and_blank_lines() {
        let body = "\u{feff}#EXTM3U\n\n#EXTINF:-1,Radio http://in.comment\n   http://stream.example/live.mp3  \nhttp://stream.example/other\n";
        assert_eq!(
            extract_entry(body),
            Some((PlaylistFormat::M3u, "http://stream.example/live.mp3".to_string()))
        );
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(extract_stream_url(""), None);
        assert_eq!(extract_stream_url("#EXTM3U\n#EXTINF:-1,Nothing\n"), None);
        assert_eq!(extract_stream_url("<html><body>not a playlist</body></html>"), None);
        assert_eq!(extract_stream_url("relative/stream.mp3\n"), None);
    }
}
