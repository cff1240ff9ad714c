//! File permission handling for launcher entries.

use crate::error::{Result, ViddyError};
use std::path::Path;
use tracing::debug;

/// Mark a launcher entry executable (mode 0o755).
///
/// Desktop environments refuse to launch untrusted entries that lack the
/// bit. A no-op where there is no such bit.
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::Permissions::from_mode(0o755);
        std::fs::set_permissions(path, mode).map_err(|e| ViddyError::io_with_path(e, path))?;
        debug!("Marked {} executable", path.display());
    }

    #[cfg(not(unix))]
    {
        debug!("Skipping executable bit for: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let err = set_executable(&temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ViddyError::Io { path: Some(_), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_set_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entry.desktop");
        std::fs::write(&path, "x").unwrap();

        set_executable(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
