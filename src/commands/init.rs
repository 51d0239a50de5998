//! Init command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Run the init command
pub async fn run(force: bool, config_path: &Path) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}.\n\
             Use 'aclgate init --force' to overwrite it.",
            config_path
        );
    }

    info!("Creating {:?}...", config_path);
    Config::write_default(config_path)?;
    println!("[OK] Default configuration written to {}", config_path.display());

    Ok(())
}
