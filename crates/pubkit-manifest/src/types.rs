//! Core types for the manifest document model

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Where a dependency is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySource {
    /// Resolved from the pub.dev registry by name and version constraint
    Hosted,
    /// Declared with a `git:` block
    Git,
    /// Declared with a `path:` key
    Path,
    /// Declared with an `sdk:` key (e.g. the Flutter SDK)
    Sdk,
}

impl DependencySource {
    /// Lowercase name of the source kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencySource::Hosted => "hosted",
            DependencySource::Git => "git",
            DependencySource::Path => "path",
            DependencySource::Sdk => "sdk",
        }
    }
}

impl std::fmt::Display for DependencySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dependency section of the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencySection {
    /// Runtime dependencies (`dependencies`)
    Dependencies,
    /// Development dependencies (`dev_dependencies`)
    DevDependencies,
}

impl DependencySection {
    /// The snake_case key used in the YAML file
    pub fn yaml_key(&self) -> &'static str {
        match self {
            DependencySection::Dependencies => "dependencies",
            DependencySection::DevDependencies => "dev_dependencies",
        }
    }
}

impl std::fmt::Display for DependencySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.yaml_key())
    }
}

/// A single dependency entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Package name, unique within its section
    pub name: String,
    /// Version constraint for hosted packages, or a sentinel for
    /// git ("git"), path (the path string), and sdk (the sdk name) sources
    pub version: String,
    /// Where the dependency is resolved from
    pub source: DependencySource,
}

impl Dependency {
    /// Whether this dependency was declared as a nested structure
    /// rather than a plain version scalar
    ///
    /// Derived from `source` so it can never drift out of sync.
    pub fn is_complex(&self) -> bool {
        self.source != DependencySource::Hosted
    }
}

/// Logical snapshot of a manifest, independent of the underlying YAML text
///
/// Produced fresh on every parse; never written back directly. Edits go
/// through [`apply_edits`](crate::apply_edits), which operates on the
/// original text instead. Field names are snake_case in the file and
/// camelCase in serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Package name
    pub name: Option<String>,
    /// Package description
    pub description: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// Homepage URL
    pub homepage: Option<String>,
    /// Repository URL
    pub repository: Option<String>,
    /// Issue tracker URL (`issue_tracker` in the file)
    pub issue_tracker: Option<String>,
    /// Publish target (`publish_to` in the file)
    pub publish_to: Option<String>,
    /// SDK constraints (e.g. "sdk", "flutter"), in declaration order
    #[serde(serialize_with = "serialize_pairs_as_map")]
    pub environment: Vec<(String, String)>,
    /// Runtime dependencies, in declaration order
    pub dependencies: Vec<Dependency>,
    /// Development dependencies, in declaration order
    pub dev_dependencies: Vec<Dependency>,
}

impl Manifest {
    /// Dependencies of the given section
    pub fn section(&self, section: DependencySection) -> &[Dependency] {
        match section {
            DependencySection::Dependencies => &self.dependencies,
            DependencySection::DevDependencies => &self.dev_dependencies,
        }
    }

    /// All dependencies across both sections
    pub fn all_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }

    /// Find a dependency by name in the given section
    pub fn find_dependency(&self, section: DependencySection, name: &str) -> Option<&Dependency> {
        self.section(section).iter().find(|d| d.name == name)
    }
}

fn serialize_pairs_as_map<S: Serializer>(
    pairs: &[(String, String)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

/// Staleness of a version constraint against the latest known release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionStatus {
    /// Current constraint already names the latest version
    UpToDate,
    /// Same major version, newer minor or patch available
    OutdatedMinor,
    /// A newer major version is available
    OutdatedMajor,
    /// Either side could not be read as a three-component version
    Unknown,
}

impl VersionStatus {
    /// Kebab-case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::UpToDate => "up-to-date",
            VersionStatus::OutdatedMinor => "outdated-minor",
            VersionStatus::OutdatedMajor => "outdated-major",
            VersionStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Staleness report for a single dependency
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Constraint currently in the manifest
    pub current: String,
    /// Latest version known to the registry ("unknown" when the lookup failed)
    pub latest: String,
    /// Package description from the registry
    pub description: String,
    /// Classification of current against latest
    pub status: VersionStatus,
}

/// A single declarative edit to apply to the original document text
///
/// Edits are transient: built by a caller, consumed once by
/// [`apply_edits`](crate::apply_edits), applied in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Set or delete a scalar field addressed by a dot path
    ///
    /// One segment targets a top-level key, two segments a key inside a
    /// nested mapping (e.g. `environment.sdk`). An empty value deletes.
    SetField {
        /// Dot-separated path, at most two segments
        path: String,
        /// New scalar value; empty string means delete
        value: String,
    },
    /// Overwrite the version of an entry in an existing section
    ///
    /// Silent no-op if the section is absent or not a mapping.
    SetDependencyVersion {
        /// Target section
        section: DependencySection,
        /// Package name
        name: String,
        /// New version constraint
        version: String,
    },
    /// Insert or overwrite a scalar dependency entry, creating the
    /// section if needed; a complex entry of the same name is replaced
    /// by the plain scalar
    AddDependency {
        /// Target section
        section: DependencySection,
        /// Package name
        name: String,
        /// Version constraint
        version: String,
    },
    /// Delete a dependency entry if present; no-op otherwise
    RemoveDependency {
        /// Target section
        section: DependencySection,
        /// Package name
        name: String,
    },
}
