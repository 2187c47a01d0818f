//! Approximate version staleness comparison
//!
//! This deliberately ignores pre-release tags, build metadata, and real
//! range satisfaction. The constraint is reduced to a bare dotted version
//! and compared component-wise, which is all the staleness display needs.

use crate::types::{VersionInfo, VersionStatus};

/// Characters stripped from a constraint before comparison
const CONSTRAINT_OPERATORS: &[char] = &['^', '~', '>', '=', '<'];

/// Reduce a constraint to a bare dotted version
///
/// Strips constraint operators, then keeps only the first
/// whitespace-separated token so an upper-bound clause
/// (e.g. `>=1.2.3 <2.0.0`) is dropped.
pub fn clean_constraint(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !CONSTRAINT_OPERATORS.contains(c))
        .collect();
    stripped
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

/// Classify a current version constraint against the latest known version
///
/// Returns [`VersionStatus::Unknown`] when either side does not have at
/// least three dotted components with a numeric leading component.
pub fn compare(current_constraint: &str, latest: &str) -> VersionStatus {
    let current = clean_constraint(current_constraint);
    if current.is_empty() || latest.is_empty() {
        return VersionStatus::Unknown;
    }

    let c = components(&current);
    let l = components(latest);

    if c.len() < 3 || l.len() < 3 {
        return VersionStatus::Unknown;
    }
    let (Some(c_major), Some(l_major)) = (c[0], l[0]) else {
        return VersionStatus::Unknown;
    };

    let equal =
        |a: Option<u64>, b: Option<u64>| matches!((a, b), (Some(x), Some(y)) if x == y);
    if equal(c[0], l[0]) && equal(c[1], l[1]) && equal(c[2], l[2]) {
        return VersionStatus::UpToDate;
    }
    if c_major < l_major {
        return VersionStatus::OutdatedMajor;
    }
    VersionStatus::OutdatedMinor
}

/// Build a [`VersionInfo`] for a dependency from a registry lookup result
pub fn version_info(current: &str, latest: &str, description: &str) -> VersionInfo {
    let status = if latest == "unknown" {
        VersionStatus::Unknown
    } else {
        compare(current, latest)
    };
    VersionInfo {
        current: current.to_string(),
        latest: latest.to_string(),
        description: description.to_string(),
        status,
    }
}

fn components(version: &str) -> Vec<Option<u64>> {
    version.split('.').map(|p| p.parse::<u64>().ok()).collect()
}


#[cfg(test)]
#[cfg(feature = "property-tests")]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any three-component numeric version pair gets a
        /// definite classification, and identical versions are up to date
        #[test]
        fn comparator_is_total_on_well_formed_versions(
            a in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}",
            b in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}"
        ) {
            let status = compare(&a, &b);
            prop_assert_ne!(status, VersionStatus::Unknown);
            prop_assert_eq!(compare(&a, &a), VersionStatus::UpToDate);
        }

        /// Property: operator prefixes never change the classification
        #[test]
        fn operators_are_transparent(
            v in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}",
            latest in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}"
        ) {
            let bare = compare(&v, &latest);
            prop_assert_eq!(compare(&format!("^{}", v), &latest), bare);
            prop_assert_eq!(compare(&format!("~{}", v), &latest), bare);
            prop_assert_eq!(compare(&format!(">={}", v), &latest), bare);
        }
    }
}
