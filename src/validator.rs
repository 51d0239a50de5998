//! ACL rule set validation.
//!
//! [`Validator::validate`] answers whether a rule set is safe to push and
//! lists every reason it is not. It never stops at the first problem: every
//! rule and every rule pair is examined on each call.
//!
//! Findings are produced in this order:
//! 1. per-rule findings (missing fields, permission, duplicates) in rule order
//! 2. permit/deny conflicts, permit-major
//! 3. pairwise overlaps, `(i, j)` with `i < j`

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::address::{check_overlap, OverlapMode};
use crate::permission::Role;
use crate::rule::{AclNumber, Action, Rule};

/// Kind of validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    MissingField,
    PermissionDenied,
    DuplicateAcl,
    PermitDenyConflict,
    Overlap,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::MissingField => "missing-field",
            FindingKind::PermissionDenied => "permission-denied",
            FindingKind::DuplicateAcl => "duplicate-acl",
            FindingKind::PermitDenyConflict => "permit-deny-conflict",
            FindingKind::Overlap => "overlap",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation problem. Rule references are zero-based indices into the
/// validated rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Finding {
    MissingField {
        rule: usize,
        fields: Vec<&'static str>,
    },
    PermissionDenied {
        rule: usize,
        role: Role,
    },
    DuplicateAcl {
        rule: usize,
        acl_number: AclNumber,
        first: usize,
    },
    PermitDenyConflict {
        permit: usize,
        deny: usize,
    },
    Overlap {
        first: usize,
        second: usize,
    },
}

impl Finding {
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::MissingField { .. } => FindingKind::MissingField,
            Finding::PermissionDenied { .. } => FindingKind::PermissionDenied,
            Finding::DuplicateAcl { .. } => FindingKind::DuplicateAcl,
            Finding::PermitDenyConflict { .. } => FindingKind::PermitDenyConflict,
            Finding::Overlap { .. } => FindingKind::Overlap,
        }
    }

    /// Indices of the rules involved, lower index first for pair findings.
    pub fn rules(&self) -> Vec<usize> {
        match self {
            Finding::MissingField { rule, .. }
            | Finding::PermissionDenied { rule, .. }
            | Finding::DuplicateAcl { rule, .. } => vec![*rule],
            Finding::PermitDenyConflict { permit, deny } => vec![*permit, *deny],
            Finding::Overlap { first, second } => vec![*first, *second],
        }
    }

    /// Human-readable description, resolving indices against `rules`.
    pub fn describe(&self, rules: &[Rule]) -> String {
        let show = |i: usize| {
            rules
                .get(i)
                .map_or_else(|| format!("#{}", i + 1), |r| format!("#{} ({})", i + 1, r))
        };

        match self {
            Finding::MissingField { rule, fields } => format!(
                "Missing required field(s) {} in rule {}",
                fields.join(", "),
                show(*rule)
            ),
            Finding::PermissionDenied { rule, role } => format!(
                "Role {} may not author deny rule {}",
                role,
                show(*rule)
            ),
            Finding::DuplicateAcl {
                rule,
                acl_number,
                first,
            } => format!(
                "Duplicate ACL number {} in rule {} (first seen in rule #{})",
                acl_number,
                show(*rule),
                first + 1
            ),
            Finding::PermitDenyConflict { permit, deny } => format!(
                "Permit rule {} conflicts with deny rule {}",
                show(*permit),
                show(*deny)
            ),
            Finding::Overlap { first, second } => format!(
                "Overlapping ranges between rules {} and {}",
                show(*first),
                show(*second)
            ),
        }
    }
}

/// Result of one validation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    fn push(&mut self, finding: Finding) {
        self.valid = false;
        self.findings.push(finding);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind() == kind).count()
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind() == kind)
    }
}

/// Rule set validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    mode: OverlapMode,
}

impl Validator {
    pub fn new(mode: OverlapMode) -> Self {
        Self { mode }
    }

    /// Validate `rules` on behalf of a principal holding `role`.
    pub fn validate(&self, rules: &[Rule], role: Role) -> ValidationReport {
        let mut report = ValidationReport {
            valid: true,
            findings: Vec::new(),
        };

        let mut seen: HashMap<&AclNumber, usize> = HashMap::new();
        let mut permits: Vec<usize> = Vec::new();
        let mut denies: Vec<usize> = Vec::new();

        for (index, rule) in rules.iter().enumerate() {
            let (Some(acl_number), Some(action), Some(_)) =
                (&rule.acl_number, rule.action, &rule.protocol)
            else {
                report.push(Finding::MissingField {
                    rule: index,
                    fields: rule.missing_fields(),
                });
                continue;
            };

            if !role.may_author(action) {
                report.push(Finding::PermissionDenied { rule: index, role });
            }

            match seen.get(acl_number) {
                Some(&first) => report.push(Finding::DuplicateAcl {
                    rule: index,
                    acl_number: acl_number.clone(),
                    first,
                }),
                None => {
                    seen.insert(acl_number, index);
                }
            }

            match action {
                Action::Permit => permits.push(index),
                Action::Deny => denies.push(index),
            }
        }

        for &p in &permits {
            for &d in &denies {
                if self.pair_overlaps(&rules[p], &rules[d]) {
                    report.push(Finding::PermitDenyConflict { permit: p, deny: d });
                }
            }
        }

        for i in 0..rules.len() {
            for j in (i + 1)..rules.len() {
                if self.pair_overlaps(&rules[i], &rules[j]) {
                    report.push(Finding::Overlap {
                        first: i,
                        second: j,
                    });
                }
            }
        }

        report
    }

    fn pair_overlaps(&self, a: &Rule, b: &Rule) -> bool {
        a.same_protocol(b)
            && check_overlap(
                self.mode,
                a.source.as_deref(),
                a.destination.as_deref(),
                b.source.as_deref(),
                b.destination.as_deref(),
            )
    }
}

/// Validate with the default overlap mode.
pub fn validate(rules: &[Rule], role: Role) -> ValidationReport {
    Validator::default().validate(rules, role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permit(acl: i32, proto: &str, src: &str, dst: &str) -> Rule {
        Rule::new(acl, Action::Permit, proto, src, dst)
    }

    fn deny(acl: i32, proto: &str, src: &str, dst: &str) -> Rule {
        Rule::new(acl, Action::Deny, proto, src, dst)
    }

    fn reference_pair() -> Vec<Rule> {
        vec![
            permit(1, "tcp", "10.0.0.0/24", "8.8.8.8"),
            deny(1, "tcp", "10.0.0.5", "9.9.9.9"),
        ]
    }

    #[test]
    fn test_empty_rule_set_is_valid() {
        let report = validate(&[], Role::ReadWrite);
        assert!(report.is_valid());
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_disjoint_permits_valid() {
        let rules = vec![
            permit(1, "tcp", "10.0.0.1/32", "8.8.8.8"),
            permit(2, "tcp", "10.0.0.2/32", "8.8.8.8"),
        ];
        let report = validate(&rules, Role::ReadWrite);
        assert!(report.is_valid());
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_reference_pair_read_write() {
        let report = validate(&reference_pair(), Role::ReadWrite);
        assert!(!report.is_valid());
        assert_eq!(
            report.findings,
            vec![
                Finding::DuplicateAcl {
                    rule: 1,
                    acl_number: AclNumber::new("1"),
                    first: 0,
                },
                Finding::PermitDenyConflict { permit: 0, deny: 1 },
                Finding::Overlap {
                    first: 0,
                    second: 1
                },
            ]
        );
    }

    #[test]
    fn test_reference_pair_read_only_adds_permission_denied() {
        let report = validate(&reference_pair(), Role::ReadOnly);
        assert!(!report.is_valid());
        assert_eq!(report.count(FindingKind::PermissionDenied), 1);
        assert_eq!(
            report.findings[0],
            Finding::PermissionDenied {
                rule: 1,
                role: Role::ReadOnly
            }
        );
        assert_eq!(report.count(FindingKind::DuplicateAcl), 1);
        assert_eq!(report.count(FindingKind::PermitDenyConflict), 1);
        assert_eq!(report.count(FindingKind::Overlap), 1);
    }

    #[test]
    fn test_read_only_permit_not_denied() {
        let rules = vec![permit(1, "tcp", "10.0.0.1", "8.8.8.8")];
        let report = validate(&rules, Role::ReadOnly);
        assert!(report.is_valid());
    }

    #[test]
    fn test_duplicate_only_flags_later_occurrences() {
        let rules = vec![
            permit(7, "tcp", "10.0.0.1", "8.8.8.8"),
            permit(7, "udp", "10.0.0.2", "8.8.8.8"),
            permit(7, "icmp", "10.0.0.3", "8.8.8.8"),
        ];
        let report = validate(&rules, Role::ReadWrite);
        let dups: Vec<_> = report.of_kind(FindingKind::DuplicateAcl).collect();
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].rules(), vec![1]);
        assert_eq!(dups[1].rules(), vec![2]);
        assert!(matches!(dups[1], Finding::DuplicateAcl { first: 0, .. }));
    }

    #[test]
    fn test_missing_field_excluded_from_bookkeeping() {
        let mut broken = deny(1, "tcp", "10.0.0.5", "9.9.9.9");
        broken.action = None;
        let rules = vec![permit(1, "tcp", "10.0.0.0/24", "8.8.8.8"), broken];
        let report = validate(&rules, Role::ReadOnly);

        assert_eq!(
            report.findings[0],
            Finding::MissingField {
                rule: 1,
                fields: vec!["action"]
            }
        );
        assert_eq!(report.count(FindingKind::DuplicateAcl), 0);
        assert_eq!(report.count(FindingKind::PermissionDenied), 0);
        assert_eq!(report.count(FindingKind::PermitDenyConflict), 0);
        // protocol is present, so the pair scan still sees it
        assert_eq!(report.count(FindingKind::Overlap), 1);
    }

    #[test]
    fn test_missing_protocol_never_pairs() {
        let mut a = permit(1, "tcp", "10.0.0.0/24", "8.8.8.8");
        a.protocol = None;
        let mut b = deny(2, "tcp", "10.0.0.0/24", "8.8.8.8");
        b.protocol = None;
        let c = deny(3, "tcp", "10.0.0.0/24", "8.8.8.8");
        let report = validate(&[a, b, c], Role::ReadWrite);

        assert_eq!(report.count(FindingKind::MissingField), 2);
        assert_eq!(report.count(FindingKind::Overlap), 0);
        assert_eq!(report.count(FindingKind::PermitDenyConflict), 0);
    }

    #[test]
    fn test_missing_source_fails_open() {
        let mut a = permit(1, "tcp", "10.0.0.0/24", "8.8.8.8");
        a.source = None;
        let b = deny(2, "tcp", "10.0.0.5", "8.8.8.8");
        let report = validate(&[a, b], Role::ReadWrite);
        assert!(report.is_valid());
    }

    #[test]
    fn test_protocol_mismatch_no_conflict() {
        let rules = vec![
            permit(1, "tcp", "10.0.0.0/24", "8.8.8.8"),
            deny(2, "udp", "10.0.0.5", "8.8.8.8"),
        ];
        assert!(validate(&rules, Role::ReadWrite).is_valid());
    }

    #[test]
    fn test_malformed_address_fails_open() {
        let rules = vec![
            permit(1, "tcp", "10.0.0.0/33", "8.8.8.8"),
            deny(2, "tcp", "10.0.0.5", "8.8.8.8"),
        ];
        assert!(validate(&rules, Role::ReadWrite).is_valid());
    }

    #[test]
    fn test_dotted_netmask_source_conflicts() {
        let rules = vec![
            permit(1, "tcp", "10.0.0.0/255.255.255.0", "8.8.8.8"),
            deny(2, "tcp", "10.0.0.5", "8.8.8.8"),
        ];
        let report = validate(&rules, Role::ReadWrite);
        assert!(!report.is_valid());
        assert_eq!(report.count(FindingKind::PermitDenyConflict), 1);
        assert_eq!(report.count(FindingKind::Overlap), 1);
    }

    #[test]
    fn test_numeric_and_text_acl_numbers_are_duplicates() {
        let rules: Vec<Rule> = serde_json::from_str(
            r#"[
                {"acl_number": 1, "action": "permit", "protocol": "tcp",
                 "source": "10.0.0.1", "destination": "8.8.8.8"},
                {"acl_number": "1", "action": "permit", "protocol": "tcp",
                 "source": "10.0.0.2", "destination": "8.8.8.8"}
            ]"#,
        )
        .unwrap();
        let report = validate(&rules, Role::ReadWrite);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(
            report.findings[0],
            Finding::DuplicateAcl {
                rule: 1,
                acl_number: AclNumber::from(1),
                first: 0,
            }
        );
    }

    #[test]
    fn test_same_action_overlap_reported_without_conflict() {
        let rules = vec![
            deny(1, "ip", "192.168.0.0/16", "any"),
            deny(2, "ip", "192.168.10.0/24", "any"),
        ];
        let report = validate(&rules, Role::ReadWrite);
        assert_eq!(report.count(FindingKind::PermitDenyConflict), 0);
        assert_eq!(
            report.findings,
            vec![Finding::Overlap {
                first: 0,
                second: 1
            }]
        );
    }

    #[test]
    fn test_conflicts_are_permit_major() {
        let rules = vec![
            deny(1, "tcp", "10.0.0.1", "x"),
            permit(2, "tcp", "10.0.0.0/24", "x"),
            deny(3, "tcp", "10.0.0.2", "x"),
            permit(4, "tcp", "10.0.0.0/16", "x"),
        ];
        let report = validate(&rules, Role::ReadWrite);
        let conflicts: Vec<_> = report
            .of_kind(FindingKind::PermitDenyConflict)
            .map(|f| f.rules())
            .collect();
        assert_eq!(
            conflicts,
            vec![vec![1, 0], vec![1, 2], vec![3, 0], vec![3, 2]]
        );
    }

    #[test]
    fn test_overlap_pairs_ordered() {
        let rules = vec![
            permit(1, "tcp", "10.0.0.0/8", "x"),
            permit(2, "tcp", "10.1.0.0/16", "x"),
            permit(3, "tcp", "10.1.1.0/24", "x"),
        ];
        let report = validate(&rules, Role::ReadWrite);
        let pairs: Vec<_> = report
            .of_kind(FindingKind::Overlap)
            .map(|f| f.rules())
            .collect();
        assert_eq!(pairs, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn test_source_and_destination_mode() {
        let validator = Validator::new(OverlapMode::SourceAndDestination);
        let report = validator.validate(&reference_pair(), Role::ReadWrite);
        // only the duplicate remains once destinations are compared
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind(), FindingKind::DuplicateAcl);

        let rules = vec![
            permit(1, "tcp", "10.0.0.0/24", "8.8.0.0/16"),
            deny(2, "tcp", "10.0.0.5", "8.8.8.8"),
        ];
        let report = validator.validate(&rules, Role::ReadWrite);
        assert_eq!(report.count(FindingKind::PermitDenyConflict), 1);
        assert_eq!(report.count(FindingKind::Overlap), 1);
    }

    #[test]
    fn test_describe_messages() {
        let rules = reference_pair();
        let report = validate(&rules, Role::ReadWrite);
        let text = report.findings[1].describe(&rules);
        assert!(text.starts_with("Permit rule #1"));
        assert!(text.contains("deny rule #2"));
    }

    #[test]
    fn test_report_serializes_kind_tag() {
        let report = validate(&reference_pair(), Role::ReadWrite);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["findings"][0]["kind"], "duplicate-acl");
        assert_eq!(json["findings"][0]["acl_number"], "1");
        assert_eq!(json["findings"][2]["kind"], "overlap");
    }

    #[test]
    fn test_input_not_mutated() {
        let rules = reference_pair();
        let before = rules.clone();
        let _ = validate(&rules, Role::ReadOnly);
        assert_eq!(rules, before);
    }
}
