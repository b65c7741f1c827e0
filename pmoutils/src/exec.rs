use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Vrai si `path` désigne un fichier régulier exécutable.
///
/// Sous Windows, l'existence du fichier suffit.
pub fn is_executable_file(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// Cherche `name` dans les répertoires du `PATH`.
///
/// Un nom contenant un séparateur de chemin est vérifié tel quel.
/// Sous Windows, les extensions de `PATHEXT` sont essayées.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable_file(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    find_in_dirs(name, &path_var)
}

fn find_in_dirs(name: &str, path_var: &OsString) -> Option<PathBuf> {
    for dir in env::split_paths(path_var) {
        for file_name in candidate_names(name) {
            let full = dir.join(&file_name);
            if is_executable_file(&full) {
                debug!(executable = %full.display(), "Found executable on PATH");
                return Some(full);
            }
        }
    }
    None
}

#[cfg(windows)]
fn candidate_names(name: &str) -> Vec<String> {
    let exts = env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT;.COM".to_string());
    let mut names = vec![name.to_string()];
    names.extend(
        exts.split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!("{}{}", name, ext.to_lowercase())),
    );
    names
}

#[cfg(not(windows))]
fn candidate_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}
