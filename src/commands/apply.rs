//! Apply command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{load_config, path_or, resolve_role};
use crate::applier::{Applier, ApplyOutcome};
use crate::backup::BackupStore;
use crate::loader::Loader;
use crate::lock::LockGuard;
use crate::transport::SshTransport;
use crate::validator::Validator;

/// Run the apply command
pub async fn run(
    rules: Option<PathBuf>,
    devices: Option<PathBuf>,
    dry_run: bool,
    user: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let config = load_config(config_path)?;
    let role = resolve_role(&config, user)?;

    let loader = Loader::default();
    let rules_path = path_or(rules, &config.rules_file);
    let rules = loader
        .load_rules(&rules_path)
        .with_context(|| format!("Failed to load rules from {:?}", rules_path))?;
    let devices_path = path_or(devices, &config.devices_file);
    let devices = loader
        .load_devices(&devices_path)
        .with_context(|| format!("Failed to load devices from {:?}", devices_path))?;

    let applier = Applier::new(
        Box::new(SshTransport::default()),
        BackupStore::new(&config.backup_dir),
    )
    .with_validator(Validator::new(config.overlap_mode))
    .dry_run(dry_run);

    if devices.is_empty() {
        applier.check(&rules, role)?;
        warn!("No devices defined in {:?}. Nothing to do.", devices_path);
        return Ok(());
    }

    // Dry runs never touch devices, so they don't need the lock
    let _lock = if dry_run {
        None
    } else {
        Some(LockGuard::acquire(&config.lock_file)?)
    };

    info!(
        "Applying {} rule(s) to {} device(s) as {}{}",
        rules.len(),
        devices.len(),
        role,
        if dry_run { " (dry run)" } else { "" }
    );

    let results = applier.configure_all(&devices, &rules, role).await?;

    let mut failures = 0;
    println!();
    for device in &results {
        match &device.result {
            Ok(ApplyOutcome::DryRun { commands }) => {
                println!("{}:", device.host);
                for command in commands {
                    println!("  Dry Run: {}", command);
                }
            }
            Ok(ApplyOutcome::Applied {
                backup, commands, ..
            }) => {
                println!(
                    "[OK] {}: {} line(s) applied (backup: {})",
                    device.host,
                    commands.len(),
                    backup.path.display()
                );
            }
            Err(e) => {
                failures += 1;
                println!("[FAIL] {}: {}", device.host, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} device(s) failed", failures, results.len());
    }

    Ok(())
}
