//! Target device definitions.

use serde::{Deserialize, Serialize};

/// A network device that receives ACL changes.
///
/// Unknown keys in the device file are ignored, so existing inventory files
/// carrying extra connection parameters still load. Passwords are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub host: String,

    #[serde(default = "default_device_type")]
    pub device_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_device_type() -> String {
    "cisco_ios".to_string()
}

fn default_port() -> u16 {
    22
}

impl Device {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            device_type: default_device_type(),
            username: None,
            port: default_port(),
        }
    }

    /// ssh destination (`user@host` or `host`)
    pub fn ssh_target(&self) -> String {
        match &self.username {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }
}
