//! Human-readable terminal output

use colored::Colorize;
use pubkit_manifest::{Dependency, Manifest, VersionInfo, VersionStatus};
use pubkit_registry::SearchResult;
use std::collections::BTreeMap;

pub fn manifest(manifest: &Manifest) {
    if let Some(name) = &manifest.name {
        println!("{} {}", name.bold(), manifest.version.as_deref().unwrap_or(""));
    }
    if let Some(description) = &manifest.description {
        println!("{}", description);
    }
    for (label, value) in [
        ("homepage", &manifest.homepage),
        ("repository", &manifest.repository),
        ("issue tracker", &manifest.issue_tracker),
        ("publish to", &manifest.publish_to),
    ] {
        if let Some(value) = value {
            println!("{}: {}", label.dimmed(), value);
        }
    }

    if !manifest.environment.is_empty() {
        println!("\n{}", "environment".bold());
        for (key, value) in &manifest.environment {
            println!("  {}: {}", key, value);
        }
    }

    print_section("dependencies", &manifest.dependencies);
    print_section("dev_dependencies", &manifest.dev_dependencies);
}

fn print_section(title: &str, deps: &[Dependency]) {
    if deps.is_empty() {
        return;
    }
    println!("\n{}", title.bold());
    for dep in deps {
        if dep.is_complex() {
            println!("  {} {} ({})", dep.name, dep.version.dimmed(), dep.source);
        } else {
            println!("  {} {}", dep.name, dep.version);
        }
    }
}

pub fn outdated(manifest: &Manifest, report: &BTreeMap<String, VersionInfo>) {
    let width = manifest
        .all_dependencies()
        .map(|d| d.name.len())
        .max()
        .unwrap_or(0);

    for dep in manifest.all_dependencies() {
        let Some(info) = report.get(&dep.name) else {
            continue;
        };
        println!(
            "  {:width$}  {:>12}  {:>12}  {}",
            dep.name,
            info.current,
            info.latest,
            status_label(info.status),
            width = width,
        );
    }
}

pub fn upgrade_line(name: &str, current: &str, latest: &str) {
    println!("  {} {} -> ^{}", name, current.dimmed(), latest);
}

pub fn search_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No packages found.");
        return;
    }
    for result in results {
        println!(
            "{} {}  {} likes, {} points",
            result.name.bold(),
            result.version,
            result.likes,
            result.points,
        );
        if !result.description.is_empty() {
            println!("  {}", result.description.dimmed());
        }
    }
}

fn status_label(status: VersionStatus) -> colored::ColoredString {
    match status {
        VersionStatus::UpToDate => "up-to-date".green(),
        VersionStatus::OutdatedMinor => "outdated-minor".yellow(),
        VersionStatus::OutdatedMajor => "outdated-major".red(),
        VersionStatus::Unknown => "unknown".dimmed(),
    }
}
