//! # pubkit-manifest
//!
//! Round-trip-safe model and edit engine for `pubspec.yaml` manifests.
//!
//! This crate provides functionality to:
//! - Parse a manifest into a typed, tolerant logical model ([`Manifest`])
//! - Apply declarative edits ([`EditOp`]) to the *original* text while
//!   preserving comments, key order, and formatting of untouched content
//! - Classify a version constraint against the latest known release
//!
//! ## Architecture
//!
//! Reads and writes are two separate tiers that share no state:
//! - The read path parses YAML into [`Manifest`], a disposable snapshot.
//! - The write path parses the same text into a line-preserving concrete
//!   syntax tree ([`document::Document`]) and splices minimal line ranges,
//!   so a naive re-serialization never happens.
//!
//! Everything here is pure and synchronous; network and subprocess
//! concerns live in `pubkit-registry` and `pubkit-runner`.
//!
//! ## Example
//!
//! ```rust
//! use pubkit_manifest::{apply_edits, parse, DependencySection, EditOp};
//!
//! let text = "name: app\ndependencies:\n  http: ^0.13.0\n";
//! let manifest = parse(text)?;
//! assert_eq!(manifest.dependencies[0].name, "http");
//!
//! let edited = apply_edits(
//!     text,
//!     &[EditOp::SetDependencyVersion {
//!         section: DependencySection::Dependencies,
//!         name: "http".to_string(),
//!         version: "^1.2.0".to_string(),
//!     }],
//! )?;
//! assert_eq!(edited, "name: app\ndependencies:\n  http: ^1.2.0\n");
//! # Ok::<(), pubkit_manifest::Error>(())
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod edit;
pub mod error;
pub mod parser;
pub mod types;
pub mod version;

// Re-export main types and entry points
pub use edit::apply_edits;
pub use error::{Error, Result};
pub use parser::parse;
pub use types::{
    Dependency, DependencySection, DependencySource, EditOp, Manifest, VersionInfo, VersionStatus,
};
pub use version::{clean_constraint, compare, version_info};
