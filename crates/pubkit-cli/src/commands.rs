//! Subcommand handlers

use crate::render;
use anyhow::{Context, Result};
use pubkit_manifest::{
    apply_edits, compare, parse, version_info, DependencySection, EditOp, VersionInfo,
    VersionStatus,
};
use pubkit_registry::PubClient;
use pubkit_runner::PubRunner;
use std::collections::BTreeMap;
use std::path::Path;

fn section_for(dev: bool) -> DependencySection {
    if dev {
        DependencySection::DevDependencies
    } else {
        DependencySection::Dependencies
    }
}

async fn read_manifest(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Apply edits to the manifest file, writing only when something changed
async fn edit_file(path: &Path, edits: &[EditOp]) -> Result<()> {
    let text = read_manifest(path).await?;
    let edited = apply_edits(&text, edits)?;
    if edited != text {
        tokio::fs::write(path, edited)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

pub async fn show(path: &Path, json: bool) -> Result<()> {
    let manifest = parse(&read_manifest(path).await?)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        render::manifest(&manifest);
    }
    Ok(())
}

pub async fn outdated(path: &Path, json: bool) -> Result<()> {
    let manifest = parse(&read_manifest(path).await?)?;
    let client = PubClient::new()?;

    let hosted: Vec<String> = manifest
        .all_dependencies()
        .filter(|d| !d.is_complex())
        .map(|d| d.name.clone())
        .collect();
    let infos = client.batch_package_info(&hosted).await;

    let mut report: BTreeMap<String, VersionInfo> = BTreeMap::new();
    for dep in manifest.all_dependencies() {
        let entry = match infos.get(&dep.name) {
            Some(info) => version_info(&dep.version, &info.latest_version, &info.description),
            // git/path/sdk dependencies have no registry version to compare
            None => version_info(&dep.version, "unknown", ""),
        };
        report.insert(dep.name.clone(), entry);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::outdated(&manifest, &report);
    }
    Ok(())
}

pub async fn upgrade(path: &Path, dry_run: bool) -> Result<()> {
    let text = read_manifest(path).await?;
    let manifest = parse(&text)?;
    let client = PubClient::new()?;

    let hosted: Vec<String> = manifest
        .all_dependencies()
        .filter(|d| !d.is_complex())
        .map(|d| d.name.clone())
        .collect();
    let infos = client.batch_package_info(&hosted).await;

    let mut edits = Vec::new();
    for section in [
        DependencySection::Dependencies,
        DependencySection::DevDependencies,
    ] {
        for dep in manifest.section(section) {
            if dep.is_complex() {
                continue;
            }
            let Some(info) = infos.get(&dep.name) else {
                continue;
            };
            if info.is_unknown() {
                continue;
            }
            if compare(&dep.version, &info.latest_version) != VersionStatus::UpToDate {
                render::upgrade_line(&dep.name, &dep.version, &info.latest_version);
                edits.push(EditOp::SetDependencyVersion {
                    section,
                    name: dep.name.clone(),
                    version: format!("^{}", info.latest_version),
                });
            }
        }
    }

    if edits.is_empty() {
        println!("All dependencies are up to date.");
        return Ok(());
    }
    if dry_run {
        println!("{} update(s) available (dry run, nothing written).", edits.len());
        return Ok(());
    }

    let edited = apply_edits(&text, &edits)?;
    tokio::fs::write(path, edited)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Updated {} package(s).", edits.len());
    Ok(())
}

pub async fn set_field(path: &Path, field_path: &str, value: &str) -> Result<()> {
    edit_file(
        path,
        &[EditOp::SetField {
            path: field_path.to_string(),
            value: value.to_string(),
        }],
    )
    .await?;
    if value.is_empty() {
        println!("Deleted {}.", field_path);
    } else {
        println!("Set {} = {}.", field_path, value);
    }
    Ok(())
}

pub async fn add(path: &Path, name: &str, version: Option<&str>, dev: bool) -> Result<()> {
    let version = match version {
        Some(v) => v.to_string(),
        None => {
            let client = PubClient::new()?;
            let info = client
                .package_info(name)
                .await
                .with_context(|| format!("failed to resolve latest version of '{}'", name))?;
            format!("^{}", info.latest_version)
        }
    };

    let section = section_for(dev);
    edit_file(
        path,
        &[EditOp::AddDependency {
            section,
            name: name.to_string(),
            version: version.clone(),
        }],
    )
    .await?;
    println!("Added {} {} to {}.", name, version, section);
    Ok(())
}

pub async fn remove(path: &Path, name: &str, dev: bool) -> Result<()> {
    let section = section_for(dev);
    edit_file(
        path,
        &[EditOp::RemoveDependency {
            section,
            name: name.to_string(),
        }],
    )
    .await?;
    println!("Removed {} from {}.", name, section);
    Ok(())
}

pub async fn search(query: &str) -> Result<()> {
    let client = PubClient::new()?;
    let results = client.search(query).await?;
    render::search_results(&results);
    Ok(())
}

pub async fn get(path: &Path) -> Result<()> {
    let root = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    let runner = PubRunner::new(root);
    let output = runner.pub_get().await?;
    print!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pubspec.yaml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_add_with_explicit_version_writes_file() {
        let (_dir, path) = manifest_file("name: app\n");
        add(&path, "http", Some("^1.2.0"), false).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "name: app\ndependencies:\n  http: ^1.2.0\n");
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_file_untouched() {
        let content = "name: app\ndependencies:\n  http: ^1.0.0\n";
        let (_dir, path) = manifest_file(content);
        remove(&path, "nope", false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_set_and_delete_field() {
        let (_dir, path) = manifest_file("name: app\ndescription: old\n");
        set_field(&path, "description", "new words").await.unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("description: new words"));

        set_field(&path, "description", "").await.unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("description"));
    }

    #[tokio::test]
    async fn test_dev_flag_targets_dev_dependencies() {
        let (_dir, path) = manifest_file("name: app\n");
        add(&path, "test", Some("^1.21.0"), true).await.unwrap();
        let manifest = parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(manifest
            .find_dependency(DependencySection::DevDependencies, "test")
            .is_some());
        assert!(manifest
            .find_dependency(DependencySection::Dependencies, "test")
            .is_none());
    }
}
