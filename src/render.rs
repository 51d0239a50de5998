//! Rendering of rules into `access-list` configuration lines.

use crate::rule::Rule;

/// Render one rule.
///
/// Rules with a port are rendered as host-to-host entries. Absent address
/// fields render as `any`.
///
/// # Examples
/// ```
/// use aclgate::render::render_rule;
/// use aclgate::rule::{Action, Rule};
///
/// let rule = Rule::new(101, Action::Permit, "tcp", "10.0.0.1", "10.0.0.2").with_port(443);
/// assert_eq!(
///     render_rule(&rule),
///     "access-list 101 permit tcp host 10.0.0.1 host 10.0.0.2 eq 443"
/// );
/// ```
pub fn render_rule(rule: &Rule) -> String {
    let field = |v: Option<String>| v.unwrap_or_else(|| "any".to_string());

    let mut command = format!(
        "access-list {} {} {} ",
        field(rule.acl_number.as_ref().map(|n| n.to_string())),
        field(rule.action.map(|a| a.to_string())),
        field(rule.protocol.clone()),
    );

    let source = field(rule.source.clone());
    let destination = field(rule.destination.clone());

    match rule.port {
        Some(port) => command.push_str(&format!("host {} host {} eq {}", source, destination, port)),
        None => command.push_str(&format!("{} {}", source, destination)),
    }

    command
}

/// Render a rule set in order.
pub fn render_rules(rules: &[Rule]) -> Vec<String> {
    rules.iter().map(render_rule).collect()
}
