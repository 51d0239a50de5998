//! Configuration management for aclgate.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::address::OverlapMode;
use crate::permission::RoleTable;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/aclgate/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule set file (JSON array of rules)
    pub rules_file: PathBuf,

    /// Device inventory file (JSON array of devices)
    pub devices_file: PathBuf,

    /// Directory receiving pre-change configuration backups
    pub backup_dir: PathBuf,

    /// Lock file guarding concurrent pushes
    pub lock_file: PathBuf,

    /// Append-only audit trail of backups, pushes and rejections (null disables)
    pub change_log: Option<PathBuf>,

    /// Address fields compared by the overlap checks (source-only, source-and-destination)
    pub overlap_mode: OverlapMode,

    /// Principal to role mapping
    pub roles: RoleTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_file: PathBuf::from("acl_rules.json"),
            devices_file: PathBuf::from("devices.json"),
            backup_dir: PathBuf::from("/var/lib/aclgate/backups"),
            lock_file: PathBuf::from("/var/run/aclgate.lock"),
            change_log: Some(PathBuf::from("/var/log/aclgate/acl_changes.log")),
            overlap_mode: OverlapMode::default(),
            roles: RoleTable::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(
                "No config at {:?}, using defaults",
                path.as_ref()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.roles.is_empty() {
            anyhow::bail!("At least one role must be configured under 'roles'");
        }

        for (principal, _) in self.roles.iter() {
            if principal.trim().is_empty() {
                anyhow::bail!("Role table contains an empty principal name");
            }
        }

        if self.backup_dir.as_os_str().is_empty() {
            anyhow::bail!("backup_dir cannot be empty");
        }

        if self.lock_file.as_os_str().is_empty() {
            anyhow::bail!("lock_file cannot be empty");
        }

        if matches!(&self.change_log, Some(p) if p.as_os_str().is_empty()) {
            anyhow::bail!("change_log cannot be empty (use null to disable it)");
        }

        Ok(())
    }

    /// Write the commented default configuration to `path` atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = Self::generate_default_yaml();

        let parent_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent_dir)
            .with_context(|| format!("Failed to create config directory {:?}", parent_dir))?;
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}
