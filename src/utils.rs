use std::io;
use std::path::{Path, PathBuf};

/// The user's home directory, if the platform reports one.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Shorten a path for display by stripping `base`.
///
/// Paths outside `base` (or equal to it) are shown unchanged.
pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    match base.and_then(|b| path.strip_prefix(b).ok()) {
        Some(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        _ => path.display().to_string(),
    }
}

/// Size of a single file; zero when it cannot be stat'ed.
pub fn file_size(path: &Path) -> u64 {
    std::fs::symlink_metadata(path)
        .map(|m| m.len())
        .unwrap_or(0)
}

/// Remove a file or symlink. Returns bytes freed on success.
pub fn remove_file(path: &Path) -> io::Result<u64> {
    let size = file_size(path);
    std::fs::remove_file(path)?;
    Ok(size)
}

/// Whether a removal failure means "someone else holds this file".
///
/// Covers access-denied and busy errors everywhere, plus the Windows
/// sharing and lock violations (`ERROR_SHARING_VIOLATION`,
/// `ERROR_LOCK_VIOLATION`).
pub fn is_in_use(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) {
        return true;
    }
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_base() {
        let base = Path::new("/home/alex");
        let shown = display_path(Path::new("/home/alex/AppData/Local/Temp"), Some(base));
        assert_eq!(shown, Path::new("AppData/Local/Temp").display().to_string());
    }

    #[test]
    fn leaves_foreign_paths_alone() {
        let base = Path::new("/home/alex");
        assert_eq!(display_path(Path::new("/var/tmp"), Some(base)), "/var/tmp");
        assert_eq!(display_path(Path::new("/var/tmp"), None), "/var/tmp");
    }

    #[test]
    fn base_itself_is_shown_in_full() {
        let base = Path::new("/home/alex");
        assert_eq!(display_path(base, Some(base)), "/home/alex");
    }

    #[test]
    fn in_use_classification() {
        assert!(is_in_use(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(is_in_use(&io::Error::from(io::ErrorKind::ResourceBusy)));
        assert!(!is_in_use(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_in_use(&io::Error::from(io::ErrorKind::InvalidInput)));
    }

    #[test]
    fn remove_file_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.tmp");
        std::fs::write(&path, b"12345").unwrap();
        assert_eq!(remove_file(&path).unwrap(), 5);
        assert!(!path.exists());
    }
}
