//! CLI command implementations.

pub mod apply;
pub mod backup;
pub mod init;
pub mod validate;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::permission::Role;

/// Load the config file, or defaults when it does not exist.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))
}

/// Resolve the acting principal to a role.
pub(crate) fn resolve_role(config: &Config, user: Option<&str>) -> Result<Role> {
    let principal = user.context("No principal given. Use --user or set USER")?;
    Ok(config.roles.lookup(principal)?)
}

/// Pick the CLI override, falling back to the configured path.
pub(crate) fn path_or(override_path: Option<PathBuf>, configured: &Path) -> PathBuf {
    override_path.unwrap_or_else(|| configured.to_path_buf())
}
