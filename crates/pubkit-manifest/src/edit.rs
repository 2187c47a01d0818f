//! Edit engine: declarative edits applied to the original document text
//!
//! Edits never go through the logical model. They mutate the
//! format-preserving [`Document`] in place, so comments, key order, and
//! quoting of untouched content survive. Ops are applied strictly in
//! sequence; later ops observe the effects of earlier ones.

use crate::document::Document;
use crate::error::Result;
use crate::types::EditOp;

/// Apply an ordered batch of edits to the original manifest text
///
/// Ops targeting absent sections or entries are no-ops rather than
/// errors, so a caller can apply a batch without checking existence
/// first. An empty batch returns the input unchanged.
///
/// # Errors
/// Returns [`Error::MalformedDocument`](crate::Error::MalformedDocument)
/// if the document root is not a mapping.
pub fn apply_edits(original: &str, edits: &[EditOp]) -> Result<String> {
    let mut doc = Document::parse(original)?;

    for edit in edits {
        match edit {
            EditOp::SetField { path, value } => {
                let segments: Vec<&str> = path.split('.').collect();
                if segments.len() == 2 {
                    if value.is_empty() {
                        doc.remove_nested(segments[0], segments[1]);
                    } else {
                        doc.set_nested(segments[0], segments[1], value);
                    }
                } else if value.is_empty() {
                    doc.remove_top_level(path);
                } else {
                    doc.set_top_level(path, value);
                }
            }
            EditOp::SetDependencyVersion {
                section,
                name,
                version,
            } => {
                doc.set_nested_if_mapping(section.yaml_key(), name, version);
            }
            EditOp::AddDependency {
                section,
                name,
                version,
            } => {
                doc.set_nested(section.yaml_key(), name, version);
            }
            EditOp::RemoveDependency { section, name } => {
                doc.remove_nested(section.yaml_key(), name);
            }
        }
    }

    Ok(doc.to_string())
}
