//! File-based locking to prevent concurrent pushes.
//!
//! Uses flock-style advisory locking so that only one aclgate instance
//! changes device configuration at a time.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::{AclError, Result};

/// Holds an exclusive lock on the lock file until dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
}

impl LockGuard {
    /// Attempt to acquire an exclusive lock on `path` without blocking.
    ///
    /// Opens with create+read+write (no truncate) so that creation and
    /// locking do not race.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| AclError::Lock(format!("Failed to open lock file {:?}: {}", path, e)))?;

        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AclError::Lock(format!("Failed to set lock file permissions: {}", e)))?;

        file.try_lock_exclusive().map_err(|_| {
            AclError::Lock(format!(
                "Another aclgate instance is already pushing changes.\n\
                 If you believe this is an error, remove the lock file: {:?}",
                path
            ))
        })?;

        Ok(Self { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_acquire_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aclgate.lock");

        let guard = LockGuard::acquire(&path).unwrap();
        drop(guard);
        assert!(LockGuard::acquire(&path).is_ok());
    }

    #[test]
    fn test_second_lock_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aclgate.lock");

        let _guard = LockGuard::acquire(&path).unwrap();
        let err = LockGuard::acquire(&path).unwrap_err();
        assert!(err.to_string().contains("already pushing"));
    }

    #[test]
    fn test_lock_file_permissions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run/aclgate.lock");
        let _guard = LockGuard::acquire(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
