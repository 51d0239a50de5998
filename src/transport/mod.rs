//! Device session transport abstraction.

mod ssh;

use async_trait::async_trait;

pub use ssh::SshTransport;

use crate::device::Device;
use crate::error::Result;

/// Command that fetches the ACL portion of the running configuration.
pub const SHOW_ACL_COMMAND: &str = "show running-config | include access-list";

/// An open session with one device.
#[async_trait]
pub trait DeviceSession: Send {
    /// Run an exec-mode command and return its output.
    async fn send_command(&mut self, command: &str) -> Result<String>;

    /// Send a batch of configuration commands and return the device output.
    async fn send_config_set(&mut self, commands: &[String]) -> Result<String>;

    /// Close the session. Further calls fail.
    async fn disconnect(&mut self) -> Result<()>;
}

/// Opens sessions to devices.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    async fn open(&self, device: &Device) -> Result<Box<dyn DeviceSession>>;
}

/// Check that a configuration line cannot smuggle extra lines or control
/// sequences into a session.
pub(crate) fn is_safe_command_line(line: &str) -> bool {
    !line.is_empty() && !line.chars().any(|c| c.is_control())
}
