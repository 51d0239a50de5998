//! ssh transport using the system ssh client.
//!
//! Each command is a separate non-interactive ssh invocation. Authentication
//! is whatever the operator's ssh setup provides (keys, agent); `BatchMode`
//! keeps ssh from ever prompting.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::{is_safe_command_line, DeviceSession, DeviceTransport};
use crate::cmd_abstraction::{args_to_strings, CommandExecutor, RealCommandExecutor};
use crate::device::Device;
use crate::error::{AclError, Result};

const SSH_PATH: &str = "ssh";
const CONNECT_TIMEOUT_SECS: u32 = 10;

/// Transport that shells out to `ssh`.
pub struct SshTransport {
    executor: Arc<dyn CommandExecutor>,
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new(Arc::new(RealCommandExecutor::new()))
    }
}

impl SshTransport {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }
}

fn ssh_args(device: &Device) -> Vec<String> {
    let port = device.port.to_string();
    let timeout = format!("ConnectTimeout={}", CONNECT_TIMEOUT_SECS);
    let target = device.ssh_target();
    args_to_strings(&[
        "-o",
        "BatchMode=yes",
        "-o",
        &timeout,
        "-p",
        &port,
        "-T",
        "--",
        &target,
    ])
}

/// Host and user names end up in ssh's argv; neither may look like an option.
fn is_safe_target_part(part: &str) -> bool {
    !part.starts_with('-') && is_safe_command_line(part)
}

#[async_trait]
impl DeviceTransport for SshTransport {
    async fn open(&self, device: &Device) -> Result<Box<dyn DeviceSession>> {
        if !is_safe_target_part(&device.host) {
            return Err(AclError::Transport {
                host: device.host.clone(),
                message: "invalid host name".to_string(),
            });
        }
        if let Some(user) = device.username.as_deref() {
            if !is_safe_target_part(user) {
                return Err(AclError::Transport {
                    host: device.host.clone(),
                    message: format!("invalid user name {:?}", user),
                });
            }
        }

        debug!("Opening ssh session to {}", device.ssh_target());
        Ok(Box::new(SshSession {
            executor: Arc::clone(&self.executor),
            host: device.host.clone(),
            args: ssh_args(device),
            open: true,
        }))
    }
}

struct SshSession {
    executor: Arc<dyn CommandExecutor>,
    host: String,
    args: Vec<String>,
    open: bool,
}

impl SshSession {
    fn transport_error(&self, message: impl Into<String>) -> AclError {
        AclError::Transport {
            host: self.host.clone(),
            message: message.into(),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(self.transport_error("session closed"))
        }
    }
}

#[async_trait]
impl DeviceSession for SshSession {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        self.ensure_open()?;
        if !is_safe_command_line(command) {
            return Err(self.transport_error(format!("refusing unsafe command: {:?}", command)));
        }

        let mut args = self.args.clone();
        args.push(command.to_string());

        let output = self
            .executor
            .execute(SSH_PATH, &args)
            .map_err(|e| self.transport_error(e.to_string()))?;

        if !output.success {
            return Err(self.transport_error(output.stderr.trim().to_string()));
        }
        Ok(output.stdout)
    }

    async fn send_config_set(&mut self, commands: &[String]) -> Result<String> {
        self.ensure_open()?;
        if let Some(bad) = commands.iter().find(|c| !is_safe_command_line(c)) {
            return Err(self.transport_error(format!("refusing unsafe command: {:?}", bad)));
        }

        let mut script = String::from("configure terminal\n");
        for command in commands {
            script.push_str(command);
            script.push('\n');
        }
        script.push_str("end\n");

        info!("Sending {} configuration line(s) to {}", commands.len(), self.host);
        let output = self
            .executor
            .execute_with_stdin(SSH_PATH, &self.args, &script)
            .map_err(|e| self.transport_error(e.to_string()))?;

        if !output.success {
            return Err(self.transport_error(output.stderr.trim().to_string()));
        }
        Ok(output.stdout)
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.open = false;
        debug!("Closed ssh session to {}", self.host);
        Ok(())
    }
}
