//! Backup command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::error;

use super::{load_config, path_or};
use crate::applier::Applier;
use crate::backup::BackupStore;
use crate::loader::Loader;
use crate::transport::SshTransport;

/// Run the backup command
pub async fn run(devices: Option<PathBuf>, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    let devices_path = path_or(devices, &config.devices_file);
    let devices = Loader::default()
        .load_devices(&devices_path)
        .with_context(|| format!("Failed to load devices from {:?}", devices_path))?;

    let applier = Applier::new(
        Box::new(SshTransport::default()),
        BackupStore::new(&config.backup_dir),
    );

    let mut failures = 0;
    for device in &devices {
        match applier.backup(device).await {
            Ok(record) => println!(
                "[OK] {}: {} byte(s) -> {}",
                device.host,
                record.bytes,
                record.path.display()
            ),
            Err(e) => {
                failures += 1;
                error!("An error occurred while backing up config for {}: {}", device.host, e);
                println!("[FAIL] {}: {}", device.host, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} backup(s) failed", failures, devices.len());
    }

    Ok(())
}
