//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "aclgate")]
#[command(author, version, about = "ACL rule set validation and deployment for network devices")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Principal to act as, resolved through the configured role table
    #[arg(short, long, env = "USER", global = true)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a rule set and report every finding
    Validate {
        /// Rule file (defaults to rules_file from config)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(long, short, default_value = "text")]
        format: String,
    },

    /// Validate, back up, and push a rule set to every device
    Apply {
        /// Rule file (defaults to rules_file from config)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Device file (defaults to devices_file from config)
        #[arg(long)]
        devices: Option<PathBuf>,

        /// Dry-run mode: validate and print commands, contact no device
        #[arg(long)]
        dry_run: bool,
    },

    /// Back up the current ACL configuration of every device
    Backup {
        /// Device file (defaults to devices_file from config)
        #[arg(long)]
        devices: Option<PathBuf>,
    },

    /// Write the default configuration file to the --config path
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}
