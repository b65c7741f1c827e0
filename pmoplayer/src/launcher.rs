//! Fire-and-forget process launches

use crate::error::{PlayerError, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use tracing::{debug, info, warn};

/// OS launch surface used by the playback controller
pub trait Launcher: Send + Sync {
    /// Open `target` (file path or URL) with the OS default application
    fn open_with_default(&self, target: &str) -> Result<()>;

    /// Start `program` with `args`, detached from the caller
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<()>;
}

/// Launches real processes
///
/// Children get null stdio and are waited on by a short-lived reaper thread;
/// nothing keeps a handle on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_with_default(&self, target: &str) -> Result<()> {
        let (program, args) = default_open_command(target);
        info!(%program, %target, "Opening with default handler");
        spawn(Path::new(program), &args)
    }

    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<()> {
        info!(program = %program.display(), ?args, "Spawning detached process");
        spawn(program, args)
    }
}

/// Command line of the OS "open with default application" helper
pub fn default_open_command(target: &str) -> (&'static str, Vec<String>) {
    open_command_for(std::env::consts::OS, target)
}

/// Open helper for `os` (a `std::env::consts::OS` value)
///
/// On Windows the target goes to ShellExecute through `url.dll` as a single
/// argument, never through the cmd parser.
fn open_command_for(os: &str, target: &str) -> (&'static str, Vec<String>) {
    match os {
        "macos" => ("open", vec![target.to_string()]),
        "windows" => (
            "rundll32",
            vec!["url.dll,FileProtocolHandler".to_string(), target.to_string()],
        ),
        _ => ("xdg-open", vec![target.to_string()]),
    }
}

fn spawn(program: &Path, args: &[String]) -> Result<()> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| PlayerError::launch(program.display().to_string(), e))?;

    debug!(pid = child.id(), "Process started");
    reap(child);
    Ok(())
}

fn reap(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("pmoplayer-reap-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "Child exited"),
            Err(e) => warn!(pid, error = %e, "Failed to wait for child"),
        });
    if let Err(e) = spawned {
        warn!(pid, error = %e, "Failed to start reaper thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_open_command_passes_target_last() {
        let (program, args) = default_open_command("/tmp/x.m3u");
        assert!(!program.is_empty());
        assert_eq!(args.last().map(String::as_str), Some("/tmp/x.m3u"));
    }

    #[test]
    fn test_windows_open_keeps_query_string_whole() {
        let url = "http://radio.example/live?sid=1&fmt=mp3";
        let (program, args) = open_command_for("windows", url);
        assert_eq!(program, "rundll32");
        assert_eq!(
            args,
            vec!["url.dll,FileProtocolHandler".to_string(), url.to_string()]
        );
    }

    #[test]
    fn test_unix_open_helpers() {
        assert_eq!(open_command_for("macos", "a.m3u").0, "open");
        assert_eq!(open_command_for("linux", "a.m3u").0, "xdg-open");
        assert_eq!(open_command_for("freebsd", "a.m3u").1, vec!["a.m3u".to_string()]);
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let err = SystemLauncher
            .spawn_detached(Path::new("/definitely/not/here/vlc"), &[])
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
