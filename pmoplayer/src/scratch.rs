//! Scratch playlists handed to the OS default handler
//!
//! Opening a raw stream URL often lands in a web browser; a one-line `.m3u`
//! file is far more likely to start a media player. Files are named
//! `pmoradio-XXXX.m3u` and stale ones are swept on every write.

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const PREFIX: &str = "pmoradio-";
const SUFFIX: &str = ".m3u";

/// Default lifetime of a scratch playlist (1 hour)
pub const DEFAULT_SCRATCH_TTL: Duration = Duration::from_secs(3600);

/// Directory holding scratch playlists
#[derive(Debug, Clone)]
pub struct ScratchDir {
    dir: PathBuf,
    ttl: Duration,
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new(std::env::temp_dir(), DEFAULT_SCRATCH_TTL)
    }
}

impl ScratchDir {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Write a single-entry playlist for `url` and return its path
    ///
    /// The new file is left in place; older scratch playlists past their TTL
    /// are removed.
    pub fn write_playlist(&self, url: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let mut file = tempfile::Builder::new()
            .prefix(PREFIX)
            .suffix(SUFFIX)
            .tempfile_in(&self.dir)?;
        file.write_all(playlist_body(url).as_bytes())?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        debug!(path = %path.display(), "Scratch playlist written");

        self.remove_stale(Some(&path));
        Ok(path)
    }

    /// Remove scratch playlists older than the TTL, sparing `keep`
    ///
    /// Returns how many files were removed. Failures are logged and skipped.
    pub fn remove_stale(&self, keep: Option<&Path>) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Cannot list scratch directory");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if keep == Some(path.as_path()) || !is_scratch_name(&path) {
                continue;
            }
            let age = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok());
            // future mtimes count as fresh
            let Some(age) = age else { continue };
            if age < self.ttl {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed stale scratch playlist");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove scratch playlist"),
            }
        }
        removed
    }
}

fn playlist_body(url: &str) -> String {
    format!("#EXTM3U\n{}\n", url.trim())
}

fn is_scratch_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(PREFIX) && n.ends_with(SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_playlist_contents_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path(), DEFAULT_SCRATCH_TTL);

        let path = scratch.write_playlist("  http://stream.example/live  ").unwrap();

        assert!(is_scratch_name(&path));
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "#EXTM3U\nhttp://stream.example/live\n"
        );
    }

    #[test]
    fn test_stale_files_removed_new_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("pmoradio-old.m3u");
        let unrelated = dir.path().join("notes.m3u");
        fs::write(&old, "#EXTM3U\n").unwrap();
        fs::write(&unrelated, "#EXTM3U\n").unwrap();

        // zero TTL: everything already on disk is stale
        let scratch = ScratchDir::new(dir.path(), Duration::ZERO);
        let fresh = scratch.write_playlist("http://a.example").unwrap();

        assert!(fresh.exists());
        assert!(!old.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_fresh_files_survive() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path(), DEFAULT_SCRATCH_TTL);

        let first = scratch.write_playlist("http://a.example").unwrap();
        let second = scratch.write_playlist("http://b.example").unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
        assert_eq!(scratch.remove_stale(None), 0);
    }

    #[test]
    fn test_missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let scratch = ScratchDir::new(&nested, DEFAULT_SCRATCH_TTL);
        let path = scratch.write_playlist("http://a.example").unwrap();
        assert!(path.starts_with(&nested));
    }
}
