//! # aclgate - ACL rule set validation for network devices
//!
//! Checks a proposed ACL rule set for structural problems, permission
//! violations, duplicate ACL numbers, permit/deny contradictions, and
//! overlapping address ranges before anything is pushed to a device.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        aclgate                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: validate, apply, backup, init              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml) + Loader (serde_json)                  │
//! │    └── Role table, rule files, device inventory             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Validator (ipnet)                                          │
//! │    ├── Shape, permission, duplicate checks                  │
//! │    └── Permit/deny conflicts, pairwise overlaps             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Applier                                                    │
//! │    ├── Refuses rejected rule sets                           │
//! │    ├── BackupStore (atomic backups)                         │
//! │    ├── DeviceTransport trait -> SshTransport                │
//! │    └── Change log (tracing layer, append-only file)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use aclgate::permission::Role;
//! use aclgate::rule::{Action, Rule};
//! use aclgate::validator::{validate, FindingKind};
//!
//! let rules = vec![
//!     Rule::new(1, Action::Permit, "tcp", "10.0.0.0/24", "8.8.8.8"),
//!     Rule::new(1, Action::Deny, "tcp", "10.0.0.5", "9.9.9.9"),
//! ];
//!
//! let report = validate(&rules, Role::ReadWrite);
//! assert!(!report.is_valid());
//! assert_eq!(report.count(FindingKind::DuplicateAcl), 1);
//! assert_eq!(report.count(FindingKind::PermitDenyConflict), 1);
//! assert_eq!(report.count(FindingKind::Overlap), 1);
//! ```
//!
//! ## Modules
//!
//! - [`address`] - Address parsing and overlap tests
//! - [`applier`] - Validated rule set application
//! - [`backup`] - Pre-change configuration backups
//! - [`change_log`] - Persistent audit trail of ACL changes
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`loader`] - Rule and device file loading
//! - [`lock`] - File locking for concurrent push prevention
//! - [`permission`] - Roles and principal lookup
//! - [`render`] - `access-list` line rendering
//! - [`reporter`] - Finding sinks and report formatting
//! - [`rule`] - ACL rule model
//! - [`transport`] - Device session abstraction (ssh)
//! - [`validator`] - Rule set validation

pub mod address;
pub mod applier;
pub mod backup;
pub mod change_log;
pub mod cli;
pub mod cmd_abstraction;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod fs_abstraction;
pub mod loader;
pub mod lock;
pub mod permission;
pub mod render;
pub mod reporter;
pub mod rule;
pub mod transport;
pub mod validator;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::AclError;
pub use validator::{validate, ValidationReport, Validator};
