//! Validated rule set application.
//!
//! The applier is the only component that talks to devices, and it refuses
//! to do so unless the validator accepts the rule set.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::backup::{BackupRecord, BackupStore};
use crate::change_log::TARGET as CHANGE_LOG;
use crate::device::Device;
use crate::error::{AclError, Result};
use crate::permission::Role;
use crate::render::render_rules;
use crate::reporter::{FindingSink, TracingSink};
use crate::rule::Rule;
use crate::transport::{DeviceTransport, SHOW_ACL_COMMAND};
use crate::validator::Validator;

/// What happened on one device
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ApplyOutcome {
    /// Commands rendered, nothing sent
    DryRun { commands: Vec<String> },
    /// Commands sent after a successful backup
    Applied {
        backup: BackupRecord,
        commands: Vec<String>,
        output: String,
    },
}

impl ApplyOutcome {
    pub fn commands(&self) -> &[String] {
        match self {
            ApplyOutcome::DryRun { commands } | ApplyOutcome::Applied { commands, .. } => commands,
        }
    }
}

/// Per-device result of [`Applier::configure_all`]
#[derive(Debug)]
pub struct DeviceResult {
    pub host: String,
    pub result: Result<ApplyOutcome>,
}

/// Pushes validated rule sets to devices.
pub struct Applier {
    validator: Validator,
    transport: Box<dyn DeviceTransport>,
    backups: BackupStore,
    sink: Box<dyn FindingSink>,
    dry_run: bool,
}

impl Applier {
    pub fn new(transport: Box<dyn DeviceTransport>, backups: BackupStore) -> Self {
        Self {
            validator: Validator::default(),
            transport,
            backups,
            sink: Box::new(TracingSink),
            dry_run: false,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn FindingSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate `rules`, reporting findings to the sink.
    ///
    /// Returns `AclError::ValidationFailed` when the rule set is rejected.
    pub fn check(&self, rules: &[Rule], role: Role) -> Result<()> {
        let report = self.validator.validate(rules, role);
        if report.is_valid() {
            return Ok(());
        }

        report.emit(rules, self.sink.as_ref());
        error!(
            target: CHANGE_LOG,
            role = %role,
            findings = report.findings.len(),
            "Validation failed. Aborting configuration."
        );
        Err(AclError::ValidationFailed(report.findings.len()))
    }

    /// Validate and apply `rules` to one device.
    pub async fn configure(&self, device: &Device, rules: &[Rule], role: Role) -> Result<ApplyOutcome> {
        self.check(rules, role)?;
        self.push(device, rules).await
    }

    /// Validate once, then apply `rules` to every device in order.
    ///
    /// A failing device does not stop the remaining ones.
    pub async fn configure_all(
        &self,
        devices: &[Device],
        rules: &[Rule],
        role: Role,
    ) -> Result<Vec<DeviceResult>> {
        self.check(rules, role)?;

        let mut results = Vec::with_capacity(devices.len());
        for device in devices {
            info!("Configuring ACLs on {}", device.host);
            let result = self.push(device, rules).await;
            if let Err(ref e) = result {
                error!("An error occurred while configuring ACLs for {}: {}", device.host, e);
            }
            results.push(DeviceResult {
                host: device.host.clone(),
                result,
            });
        }
        Ok(results)
    }

    /// Fetch the device's current ACL configuration and store it.
    pub async fn backup(&self, device: &Device) -> Result<BackupRecord> {
        let mut session = self.transport.open(device).await?;
        let fetched = session.send_command(SHOW_ACL_COMMAND).await;
        if let Err(e) = session.disconnect().await {
            warn!("Failed to close session to {}: {}", device.host, e);
        }

        let config = fetched.map_err(|e| AclError::Backup {
            host: device.host.clone(),
            message: e.to_string(),
        })?;
        let record = self.backups.save(&device.host, &config)?;
        info!(
            target: CHANGE_LOG,
            host = %device.host,
            "Backup saved to {}",
            record.path.display()
        );
        Ok(record)
    }

    async fn push(&self, device: &Device, rules: &[Rule]) -> Result<ApplyOutcome> {
        let commands = render_rules(rules);

        if self.dry_run {
            return Ok(ApplyOutcome::DryRun { commands });
        }

        let backup = self.backup(device).await?;

        let mut session = self.transport.open(device).await?;
        let sent = session.send_config_set(&commands).await;
        if let Err(e) = session.disconnect().await {
            warn!("Failed to close session to {}: {}", device.host, e);
        }
        let output = sent?;

        info!(
            target: CHANGE_LOG,
            host = %device.host,
            lines = commands.len(),
            "ACL changes applied successfully. Device output: {}",
            output.trim()
        );
        Ok(ApplyOutcome::Applied {
            backup,
            commands,
            output,
        })
    }
}
