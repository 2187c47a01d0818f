//! Domain types for registry lookups

use serde::{Deserialize, Serialize};

/// Sentinel latest-version string for failed lookups
pub const UNKNOWN_VERSION: &str = "unknown";

/// Resolved package information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    /// Package name
    pub name: String,
    /// Latest published version, or [`UNKNOWN_VERSION`] when the lookup failed
    pub latest_version: String,
    /// Description from the latest published pubspec
    pub description: String,
}

impl PackageInfo {
    /// Sentinel result for a package whose lookup failed
    ///
    /// A failing package never aborts a batch; it degrades to this.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest_version: UNKNOWN_VERSION.to_string(),
            description: String::new(),
        }
    }

    /// Whether this is the failed-lookup sentinel
    pub fn is_unknown(&self) -> bool {
        self.latest_version == UNKNOWN_VERSION
    }
}

/// Pana score for a package, as reported by the metrics endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageScore {
    /// Granted pub points
    #[serde(default)]
    pub granted_points: u32,
    /// Like count
    #[serde(default)]
    pub like_count: u32,
}

/// One entry of a search result listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Package name
    pub name: String,
    /// Latest published version (empty when the detail lookup failed)
    pub version: String,
    /// Package description
    pub description: String,
    /// Like count
    pub likes: u32,
    /// Granted pub points
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let info = PackageInfo::unknown("http");
        assert_eq!(info.name, "http");
        assert_eq!(info.latest_version, UNKNOWN_VERSION);
        assert!(info.is_unknown());
    }

    #[test]
    fn test_score_tolerates_missing_fields() {
        let score: PackageScore = serde_json::from_str("{}").unwrap();
        assert_eq!(score.granted_points, 0);
        assert_eq!(score.like_count, 0);
    }
}
