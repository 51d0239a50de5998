//! Permission context and principal lookup.
//!
//! The role is always passed explicitly to the validator; nothing here keeps
//! a "current user" around.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::{AclError, Result};
use crate::rule::Action;

/// Permission level of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    ReadWrite,
    ReadOnly,
}

impl Role {
    /// Whether this role may author a rule with the given action.
    ///
    /// Only read-write principals may author rules that block traffic.
    pub fn may_author(&self, action: Action) -> bool {
        match (self, action) {
            (Role::ReadOnly, Action::Deny) => false,
            _ => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ReadWrite => "read-write",
            Role::ReadOnly => "read-only",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps principal names to roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTable(BTreeMap<String, Role>);

impl Default for RoleTable {
    fn default() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert("admin".to_string(), Role::ReadWrite);
        roles.insert("user".to_string(), Role::ReadOnly);
        Self(roles)
    }
}

impl RoleTable {
    /// Resolve a principal to its role.
    pub fn lookup(&self, principal: &str) -> Result<Role> {
        let role = self
            .0
            .get(principal)
            .copied()
            .ok_or_else(|| AclError::UnknownPrincipal(principal.to_string()))?;
        debug!("Principal {} resolved to role {}", principal, role);
        Ok(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Role)> {
        self.0.iter()
    }
}
