//! Flutter project detection

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Whether the project at `project_root` is a Flutter project
///
/// True when its `pubspec.yaml` contains an indented `flutter:` block or
/// an `sdk: flutter` dependency. Unreadable or missing pubspecs read as
/// plain Dart projects.
pub fn is_flutter_project(project_root: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(project_root.join("pubspec.yaml")) else {
        return false;
    };
    flutter_markers().is_match(&content)
}

fn flutter_markers() -> &'static Regex {
    static MARKERS: OnceLock<Regex> = OnceLock::new();
    MARKERS.get_or_init(|| {
        Regex::new(r"(?m)^\s+flutter:\s*$|sdk:\s*flutter").expect("flutter marker regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pubspec.yaml"), content).unwrap();
        dir
    }

    #[test]
    fn test_sdk_flutter_dependency() {
        let dir = project_with("dependencies:\n  flutter:\n    sdk: flutter\n");
        assert!(is_flutter_project(dir.path()));
    }

    #[test]
    fn test_flutter_config_block() {
        let dir = project_with("name: app\n\nflutter:\n  uses-material-design: true\n");
        // Top-level `flutter:` is not indented; only the nested block counts
        assert!(!is_flutter_project(dir.path()));

        let dir = project_with("dependencies:\n  flutter:\nname: app\n");
        assert!(is_flutter_project(dir.path()));
    }

    #[test]
    fn test_plain_dart_project() {
        let dir = project_with("name: tool\ndependencies:\n  http: ^1.0.0\n");
        assert!(!is_flutter_project(dir.path()));
    }

    #[test]
    fn test_missing_pubspec() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_flutter_project(dir.path()));
    }
}
