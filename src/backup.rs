//! Pre-change configuration backups.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{AclError, Result};

/// A backup written to disk
#[derive(Debug, Clone, Serialize)]
pub struct BackupRecord {
    pub host: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub captured_at: DateTime<Utc>,
}

/// Stores device ACL backups under one directory.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

/// Backup file name for a host: `backup_{host}_acl.txt`.
///
/// Characters that are not safe in a file name are replaced with `_`.
pub fn backup_file_name(host: &str) -> String {
    let safe: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("backup_{}_acl.txt", safe)
}

impl BackupStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Write `content` as the backup for `host`, replacing any previous one.
    ///
    /// The write is atomic (tempfile + rename) and the file is owner-only.
    pub fn save(&self, host: &str, content: &str) -> Result<BackupRecord> {
        let fail = |message: String| AclError::Backup {
            host: host.to_string(),
            message,
        };

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| fail(format!("cannot create {:?}: {}", self.dir, e)))?;

        let path = self.dir.join(backup_file_name(host));

        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| fail(e.to_string()))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| fail(e.to_string()))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| fail(e.to_string()))?;
        temp_file
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(|e| fail(e.to_string()))?;
        temp_file
            .persist(&path)
            .map_err(|e| fail(e.to_string()))?;

        info!("ACL configuration for {} backed up to {:?}", host, path);

        Ok(BackupRecord {
            host: host.to_string(),
            path,
            bytes: content.len(),
            captured_at: Utc::now(),
        })
    }
}
