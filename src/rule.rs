//! ACL rule model.
//!
//! Every field of [`Rule`] is optional so that an incomplete entry can be
//! loaded and reported by the validator instead of being rejected by the
//! parser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered rule set. Order is preserved for deterministic reporting.
pub type RuleSet = Vec<Rule>;

/// Rule action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Permit,
    Deny,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Permit => "permit",
            Action::Deny => "deny",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ACL identifier.
///
/// Rule files use both `"acl_number": 101` and `"acl_number": "101"`; both
/// load as the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "AclNumberRepr", into = "String")]
pub struct AclNumber(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum AclNumberRepr {
    Number(i64),
    Text(String),
}

impl From<AclNumberRepr> for AclNumber {
    fn from(repr: AclNumberRepr) -> Self {
        match repr {
            AclNumberRepr::Number(n) => Self(n.to_string()),
            AclNumberRepr::Text(s) => Self(s),
        }
    }
}

impl From<AclNumber> for String {
    fn from(n: AclNumber) -> Self {
        n.0
    }
}

impl AclNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i32> for AclNumber {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for AclNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for AclNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single ACL entry as read from a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acl_number: Option<AclNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Rule {
    /// Create a complete rule without a port.
    pub fn new(
        acl_number: impl Into<AclNumber>,
        action: Action,
        protocol: &str,
        source: &str,
        destination: &str,
    ) -> Self {
        Self {
            acl_number: Some(acl_number.into()),
            action: Some(action),
            protocol: Some(protocol.to_string()),
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            port: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Names of required fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.acl_number.is_none() {
            missing.push("acl_number");
        }
        if self.action.is_none() {
            missing.push("action");
        }
        if self.protocol.is_none() {
            missing.push("protocol");
        }
        missing
    }

    pub fn is_well_formed(&self) -> bool {
        self.acl_number.is_some() && self.action.is_some() && self.protocol.is_some()
    }

    /// Protocol equality used by the pair checks.
    ///
    /// A rule without a protocol never matches anything, including another
    /// rule without a protocol.
    pub fn same_protocol(&self, other: &Rule) -> bool {
        match (&self.protocol, &other.protocol) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        write!(
            f,
            "acl {} {} {} {} -> {}",
            or_dash(&self.acl_number),
            or_dash(&self.action),
            or_dash(&self.protocol),
            or_dash(&self.source),
            or_dash(&self.destination),
        )?;
        if let Some(port) = self.port {
            write!(f, " eq {}", port)?;
        }
        Ok(())
    }
}
