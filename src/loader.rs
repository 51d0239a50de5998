//! Rule and device file loading.

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

use crate::device::Device;
use crate::error::{AclError, Result};
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::rule::RuleSet;

/// Reads rule sets and device inventories from JSON files.
pub struct Loader<'a> {
    fs: &'a dyn FileSystem,
}

impl Default for Loader<'static> {
    fn default() -> Self {
        Self { fs: real_fs() }
    }
}

impl<'a> Loader<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Load a JSON array of rules.
    pub fn load_rules(&self, path: &Path) -> Result<RuleSet> {
        let rules: RuleSet = self.load_json(path)?;
        debug!("Loaded {} rule(s) from {:?}", rules.len(), path);
        Ok(rules)
    }

    /// Load a JSON array of devices.
    pub fn load_devices(&self, path: &Path) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.load_json(path)?;
        debug!("Loaded {} device(s) from {:?}", devices.len(), path);
        Ok(devices)
    }

    fn load_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        if !self.fs.exists(path) {
            return Err(AclError::NotFound(path.to_path_buf()));
        }

        let content = self.fs.read_to_string(path).map_err(|source| AclError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| AclError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
