//! aclgate - ACL rule set validation and deployment for network devices

use anyhow::Result;
use clap::Parser;
use std::fs::File;
use tracing::{warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use aclgate::change_log;
use aclgate::cli::{Cli, Commands};
use aclgate::config::Config;

/// Open the configured change log for commands that touch devices.
fn open_change_log(cli: &Cli) -> (Option<File>, Option<anyhow::Error>) {
    if !matches!(cli.command, Commands::Apply { .. } | Commands::Backup { .. }) {
        return (None, None);
    }
    // Config errors are reported by the command itself
    let Some(path) = Config::load_or_default(&cli.config)
        .ok()
        .and_then(|config| config.change_log)
    else {
        return (None, None);
    };
    match change_log::open(&path) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let (change_log_file, change_log_error) = open_change_log(&cli);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .with_filter(LevelFilter::from_level(log_level));
    tracing_subscriber::registry()
        .with(change_log_file.map(change_log::layer))
        .with(stderr_layer)
        .try_init()?;

    if let Some(e) = change_log_error {
        warn!("Change log disabled: {:#}", e);
    }

    let user = cli.user.as_deref();

    match cli.command {
        Commands::Validate { rules, format } => {
            aclgate::commands::validate::run(rules, &format, user, &cli.config).await
        }
        Commands::Apply {
            rules,
            devices,
            dry_run,
        } => aclgate::commands::apply::run(rules, devices, dry_run, user, &cli.config).await,
        Commands::Backup { devices } => aclgate::commands::backup::run(devices, &cli.config).await,
        Commands::Init { force } => aclgate::commands::init::run(force, &cli.config).await,
        Commands::Version => {
            println!("aclgate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
