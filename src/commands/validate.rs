//! Validate command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{load_config, path_or, resolve_role};
use crate::loader::Loader;
use crate::reporter::{render, ReportFormat};
use crate::validator::Validator;

/// Run the validate command
pub async fn run(
    rules: Option<PathBuf>,
    format: &str,
    user: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let format: ReportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let config = load_config(config_path)?;
    let role = resolve_role(&config, user)?;

    let rules_path = path_or(rules, &config.rules_file);
    let rules = Loader::default()
        .load_rules(&rules_path)
        .with_context(|| format!("Failed to load rules from {:?}", rules_path))?;

    info!(
        "Validating {} rule(s) from {:?} as {}",
        rules.len(),
        rules_path,
        role
    );

    let report = Validator::new(config.overlap_mode).validate(&rules, role);
    print!("{}", render(&report, &rules, format)?);
    if format == ReportFormat::Json {
        println!();
    }

    if !report.is_valid() {
        anyhow::bail!(
            "Rule set rejected with {} finding(s)",
            report.findings.len()
        );
    }

    Ok(())
}
