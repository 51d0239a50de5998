//! Persistent audit trail of ACL changes.
//!
//! Events emitted with `target: TARGET` go to the normal stderr output and
//! are also appended, timestamped, to the change log file.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, Layer, Registry};

/// Tracing target of change log events
pub const TARGET: &str = "aclgate::changes";

/// Open the change log for appending, creating it and its directory.
pub fn open(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create change log directory {:?}", parent))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o640)
        .open(path)
        .with_context(|| format!("Failed to open change log {:?}", path))
}

/// Layer writing change log events to `file`.
pub fn layer(file: File) -> Box<dyn Layer<Registry> + Send + Sync> {
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(Targets::new().with_target(TARGET, Level::INFO))
        .boxed()
}
