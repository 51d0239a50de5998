//! Benchmarks for rule set validation.

use aclgate::address::OverlapMode;
use aclgate::permission::Role;
use aclgate::rule::{Action, Rule};
use aclgate::validator::Validator;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// Disjoint /24 rules, alternating permit and deny
fn generate_disjoint(count: usize) -> Vec<Rule> {
    (0..count)
        .map(|i| {
            let source = format!("10.{}.{}.0/24", (i / 256) % 256, i % 256);
            let action = if i % 2 == 0 { Action::Permit } else { Action::Deny };
            Rule::new(i as i32, action, "tcp", &source, "any")
        })
        .collect()
}

/// Rules that all fall inside one /8, so every pair overlaps
fn generate_nested(count: usize) -> Vec<Rule> {
    (0..count)
        .map(|i| {
            let source = format!("10.0.{}.{}", (i / 256) % 256, i % 256);
            let action = if i % 2 == 0 { Action::Permit } else { Action::Deny };
            Rule::new(i as i32, action, "tcp", &source, "any")
        })
        .chain(std::iter::once(Rule::new(
            -1,
            Action::Deny,
            "tcp",
            "10.0.0.0/8",
            "any",
        )))
        .collect()
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let validator = Validator::default();

    for size in [10, 100, 500] {
        let disjoint = generate_disjoint(size);
        group.bench_with_input(BenchmarkId::new("disjoint", size), &disjoint, |b, rules| {
            b.iter(|| black_box(validator.validate(rules, Role::ReadWrite)));
        });

        let nested = generate_nested(size);
        group.bench_with_input(BenchmarkId::new("nested", size), &nested, |b, rules| {
            b.iter(|| black_box(validator.validate(rules, Role::ReadWrite)));
        });
    }

    group.finish();
}

fn bench_overlap_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_mode");
    let rules = generate_disjoint(200);

    for (name, mode) in [
        ("source_only", OverlapMode::SourceOnly),
        ("source_and_destination", OverlapMode::SourceAndDestination),
    ] {
        let validator = Validator::new(mode);
        group.bench_function(name, |b| {
            b.iter(|| black_box(validator.validate(&rules, Role::ReadOnly)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate, bench_overlap_modes);
criterion_main!(benches);
