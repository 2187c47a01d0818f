//! Integration tests for pubkit-manifest
//!
//! These exercise the read and write paths together: edits applied to the
//! original text must re-parse to the expected model, and untouched
//! content must survive byte-for-byte.

use pubkit_manifest::{
    apply_edits, compare, parse, DependencySection, DependencySource, EditOp, VersionStatus,
};

const REALISTIC: &str = r#"name: weather_app
description: Shows the weather. Badly.
version: 0.4.2
homepage: https://weather.example.com

environment:
  sdk: ">=3.0.0 <4.0.0"

dependencies:
  http: ^0.13.0
  # kept in sync with the design system
  provider: ^6.0.0
  weather_icons:
    path: ../weather_icons

dev_dependencies:
  test: ^1.21.0
  flutter_lints:
    sdk: flutter
"#;

#[test]
fn noop_edit_batch_returns_input_unchanged() {
    assert_eq!(apply_edits(REALISTIC, &[]).unwrap(), REALISTIC);
}

#[test]
fn reparse_after_set_field_sees_new_value() {
    let edited = apply_edits(
        REALISTIC,
        &[EditOp::SetField {
            path: "version".to_string(),
            value: "0.5.0".to_string(),
        }],
    )
    .unwrap();
    let manifest = parse(&edited).unwrap();
    assert_eq!(manifest.version.as_deref(), Some("0.5.0"));
}

#[test]
fn editing_one_version_leaves_every_other_line_alone() {
    let edited = apply_edits(
        REALISTIC,
        &[EditOp::SetDependencyVersion {
            section: DependencySection::Dependencies,
            name: "http".to_string(),
            version: "^1.2.0".to_string(),
        }],
    )
    .unwrap();

    let before: Vec<&str> = REALISTIC.lines().collect();
    let after: Vec<&str> = edited.lines().collect();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        if b.trim_start().starts_with("http:") {
            assert_eq!(*a, "  http: ^1.2.0");
        } else {
            assert_eq!(b, a);
        }
    }
}

#[test]
fn remove_then_add_scenario() {
    let text = "dependencies:\n  a: ^1.0.0\n  b:\n    path: ../b\n";
    let edited = apply_edits(
        text,
        &[
            EditOp::RemoveDependency {
                section: DependencySection::Dependencies,
                name: "a".to_string(),
            },
            EditOp::AddDependency {
                section: DependencySection::Dependencies,
                name: "c".to_string(),
                version: "^2.0.0".to_string(),
            },
        ],
    )
    .unwrap();

    let manifest = parse(&edited).unwrap();
    let names: Vec<&str> = manifest.dependencies.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);

    let b = &manifest.dependencies[0];
    assert_eq!(b.source, DependencySource::Path);
    assert_eq!(b.version, "../b");
    assert!(b.is_complex());

    let c = &manifest.dependencies[1];
    assert_eq!(c.version, "^2.0.0");
    assert!(!c.is_complex());
}

#[test]
fn remove_missing_dependency_changes_nothing() {
    let edited = apply_edits(
        REALISTIC,
        &[EditOp::RemoveDependency {
            section: DependencySection::Dependencies,
            name: "nope".to_string(),
        }],
    )
    .unwrap();
    assert_eq!(edited, REALISTIC);
}

#[test]
fn environment_edit_roundtrips_through_model() {
    let edited = apply_edits(
        REALISTIC,
        &[EditOp::SetField {
            path: "environment.sdk".to_string(),
            value: ">=3.2.0 <4.0.0".to_string(),
        }],
    )
    .unwrap();
    let manifest = parse(&edited).unwrap();
    assert_eq!(manifest.environment[0], ("sdk".to_string(), ">=3.2.0 <4.0.0".to_string()));
}

#[test]
fn adding_dev_dependency_keeps_runtime_section_untouched() {
    let edited = apply_edits(
        REALISTIC,
        &[EditOp::AddDependency {
            section: DependencySection::DevDependencies,
            name: "mockito".to_string(),
            version: "^5.4.0".to_string(),
        }],
    )
    .unwrap();
    let manifest = parse(&edited).unwrap();
    assert_eq!(manifest.dependencies.len(), 3);
    assert!(manifest
        .find_dependency(DependencySection::DevDependencies, "mockito")
        .is_some());
    assert!(edited.contains("  # kept in sync with the design system"));
}

#[test]
fn comparator_matches_documented_cases() {
    assert_eq!(compare("1.2.3", "1.2.3"), VersionStatus::UpToDate);
    assert_eq!(compare("1.2.3", "2.0.0"), VersionStatus::OutdatedMajor);
    assert_eq!(compare("1.2.3", "1.3.0"), VersionStatus::OutdatedMinor);
    assert_eq!(compare("^1.2.3", "1.2.3"), VersionStatus::UpToDate);
    assert_eq!(compare("git", "1.2.3"), VersionStatus::Unknown);
}
