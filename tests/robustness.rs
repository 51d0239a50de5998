//! Robustness tests: hostile or degenerate input must never panic the
//! validator and must always produce a complete report.

use aclgate::address::addresses_overlap;
use aclgate::permission::Role;
use aclgate::rule::{Action, Rule, RuleSet};
use aclgate::validator::{validate, FindingKind};

/// Address edge cases fail open instead of erroring
#[test]
fn test_address_edge_cases() {
    assert!(addresses_overlap(Some("0.0.0.0/0"), Some("255.255.255.255")));
    assert!(addresses_overlap(Some("::/0"), Some("::1")));

    assert!(!addresses_overlap(Some("256.0.0.0"), Some("0.0.0.0/0")));
    assert!(!addresses_overlap(Some("192.168.1.1/33"), Some("192.168.1.1")));
    assert!(!addresses_overlap(Some("192.168.1.1/"), Some("192.168.1.1")));
    assert!(!addresses_overlap(Some("/24"), Some("0.0.0.0/0")));
    assert!(!addresses_overlap(Some(""), Some("")));
    assert!(!addresses_overlap(Some("host 10.0.0.1"), Some("10.0.0.1")));
}

/// Unicode and whitespace in rule fields
#[test]
fn test_unicode_fields() {
    let rules = vec![
        Rule::new("ＡＣＬ", Action::Permit, "tcp", "１０.0.0.1", "8.8.8.8"),
        Rule::new("ＡＣＬ", Action::Deny, "tcp", "10.0.0.1", "8.8.8.8"),
    ];
    let report = validate(&rules, Role::ReadWrite);
    assert_eq!(report.count(FindingKind::DuplicateAcl), 1);
    assert_eq!(report.count(FindingKind::Overlap), 0);
}

/// Large rule sets are scanned completely
#[test]
fn test_large_rule_set() {
    let rules: RuleSet = (0..500)
        .map(|i| {
            let source = format!("10.{}.{}.0/24", i / 256, i % 256);
            Rule::new(i, Action::Permit, "ip", &source, "any")
        })
        .collect();

    let report = validate(&rules, Role::ReadWrite);
    assert!(report.is_valid());
}

/// One wide rule overlaps every other rule in a large set
#[test]
fn test_large_rule_set_with_supernet() {
    let mut rules: RuleSet = (0..200)
        .map(|i| {
            let source = format!("10.0.{}.0/24", i);
            Rule::new(i, Action::Permit, "ip", &source, "any")
        })
        .collect();
    rules.push(Rule::new(999, Action::Deny, "ip", "10.0.0.0/16", "any"));

    let report = validate(&rules, Role::ReadWrite);
    assert_eq!(report.count(FindingKind::Overlap), 200);
    assert_eq!(report.count(FindingKind::PermitDenyConflict), 200);
    assert!(report
        .of_kind(FindingKind::Overlap)
        .all(|f| f.rules()[1] == 200));
}

/// A rule file with every entry broken still yields one finding per entry
#[test]
fn test_all_rules_malformed() {
    let rules: RuleSet = serde_json::from_str(r#"[{}, {"acl_number": 1}, {"protocol": "tcp"}]"#)
        .unwrap();
    let report = validate(&rules, Role::ReadOnly);
    assert_eq!(report.findings.len(), 3);
    assert!(report
        .findings
        .iter()
        .all(|f| f.kind() == FindingKind::MissingField));
}

/// Malformed JSON is a parse error, not a panic
#[test]
fn test_json_malformed_input() {
    let cases = [
        "",
        "[",
        "[{]",
        "null",
        r#"[{"acl_number": []}]"#,
        r#"[{"action": "PERMIT"}]"#,
        r#"[{"port": -1}]"#,
        r#"[{"port": 70000}]"#,
    ];
    for case in cases {
        let result: Result<RuleSet, _> = serde_json::from_str(case);
        assert!(result.is_err(), "expected error for {:?}", case);
    }
}
