//! Rendering of validation reports.
//!
//! The validator only returns findings. Anything that wants them logged or
//! printed goes through a [`FindingSink`] or one of the formatters here.

use anyhow::Result;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::error;

use crate::rule::Rule;
use crate::validator::{Finding, ValidationReport};

/// Receiver for individual findings.
pub trait FindingSink: Send + Sync {
    fn record(&self, rules: &[Rule], finding: &Finding);
}

/// Writes each finding as a tracing error event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FindingSink for TracingSink {
    fn record(&self, rules: &[Rule], finding: &Finding) {
        error!(kind = %finding.kind(), "{}", finding.describe(rules));
    }
}

/// Collects rendered findings in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl FindingSink for MemorySink {
    fn record(&self, rules: &[Rule], finding: &Finding) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(format!("[{}] {}", finding.kind(), finding.describe(rules)));
        }
    }
}

impl ValidationReport {
    /// Send every finding to `sink`, in report order.
    pub fn emit(&self, rules: &[Rule], sink: &dyn FindingSink) {
        for finding in &self.findings {
            sink.record(rules, finding);
        }
    }
}

/// Output format for the validate command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
        }
    }
}

/// Render a report in the requested format.
pub fn render(report: &ValidationReport, rules: &[Rule], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report, rules)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn render_text(report: &ValidationReport, rules: &[Rule]) -> String {
    let mut out = String::new();

    if report.valid {
        out.push_str(&format!("[OK] {} rule(s) validated, no findings\n", rules.len()));
        return out;
    }

    out.push_str(&format!(
        "[FAIL] {} rule(s) validated, {} finding(s)\n\n",
        rules.len(),
        report.findings.len()
    ));
    for finding in &report.findings {
        out.push_str(&format!(
            "  {:<22} {}\n",
            finding.kind().as_str(),
            finding.describe(rules)
        ));
    }
    out
}
