//! Format-preserving concrete syntax tree for block-style YAML mappings
//!
//! The write path cannot go through the logical model: re-serializing a
//! parsed model destroys comments, key order, quoting, and blank lines.
//! There is no YAML counterpart to `toml_edit`, so this module keeps every
//! source line verbatim and mutates the smallest possible line range per
//! edit. The supported subset is what package manifests actually use:
//! block mappings of scalars and nested mappings, plus single-line flow
//! mappings as section values. Anything outside the subset is treated as
//! a non-mapping value and follows the same overwrite/no-op rules.

use crate::error::{Error, Result};

/// A manifest document as an editable sequence of source lines
///
/// Unedited lines survive round trips byte-for-byte:
/// `Document::parse(text)?.to_string() == text`.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    final_newline: bool,
}

/// Location of a `key:` entry and the extent of its value block
#[derive(Debug, Clone)]
struct Entry {
    /// Line index of the key line
    start: usize,
    /// Exclusive end of the entry's extent, children included
    end: usize,
    /// Byte offset in the key line just past the `:`
    colon_end: usize,
}

impl Document {
    /// Parse text into an editable document
    ///
    /// # Errors
    /// Returns [`Error::MalformedDocument`] if the first content line is
    /// not a top-level `key:` line, i.e. the root is not a block mapping.
    pub fn parse(text: &str) -> Result<Self> {
        let (lines, final_newline) = if text.is_empty() {
            (Vec::new(), false)
        } else {
            let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
            let final_newline = text.ends_with('\n');
            if final_newline {
                lines.pop();
            }
            (lines, final_newline)
        };

        if let Some(first) = lines.iter().find(|l| !is_blank_or_comment(l)) {
            if indent_of(first) != 0 || parse_key_line(first).is_none() {
                return Err(Error::MalformedDocument(
                    "document root is not a mapping".to_string(),
                ));
            }
        }

        Ok(Self {
            lines,
            final_newline,
        })
    }

    /// Set or overwrite a top-level scalar key, appending it at the end
    /// of the document if it did not previously exist
    pub fn set_top_level(&mut self, key: &str, value: &str) {
        match self.find_entry(0, self.lines.len(), 0, key) {
            Some(entry) => self.replace_entry_with_scalar(&entry, value),
            None => self
                .lines
                .push(format!("{}: {}", key, format_scalar(value))),
        }
    }

    /// Delete a top-level key and its value block; no-op if absent
    pub fn remove_top_level(&mut self, key: &str) {
        if let Some(entry) = self.find_entry(0, self.lines.len(), 0, key) {
            self.lines.drain(entry.start..entry.end);
        }
    }

    /// Upsert a scalar entry inside the mapping under `parent`, creating
    /// or overwriting `parent` itself when it is absent or not a mapping
    pub fn set_nested(&mut self, parent: &str, key: &str, value: &str) {
        let Some(entry) = self.find_entry(0, self.lines.len(), 0, parent) else {
            self.lines.push(format!("{}:", parent));
            self.lines.push(format!("  {}: {}", key, format_scalar(value)));
            return;
        };

        if self.is_flow_mapping(&entry) {
            self.flow_upsert(&entry, key, value);
        } else if self.is_block_mapping(&entry) {
            self.block_upsert(&entry, key, value);
        } else {
            // Scalar or empty value: the prior value is overwritten
            let key_text = self.lines[entry.start][..entry.colon_end].to_string();
            self.lines.splice(
                entry.start..entry.end,
                [key_text, format!("  {}: {}", key, format_scalar(value))],
            );
        }
    }

    /// Upsert a scalar entry inside the mapping under `parent`, but only
    /// when `parent` exists and is a mapping; silent no-op otherwise
    pub fn set_nested_if_mapping(&mut self, parent: &str, key: &str, value: &str) {
        let Some(entry) = self.find_entry(0, self.lines.len(), 0, parent) else {
            return;
        };
        if self.is_flow_mapping(&entry) {
            self.flow_upsert(&entry, key, value);
        } else if self.is_block_mapping(&entry) {
            self.block_upsert(&entry, key, value);
        }
    }

    /// Delete an entry from the mapping under `parent`; no-op when the
    /// parent is absent, not a mapping, or does not contain the key
    pub fn remove_nested(&mut self, parent: &str, key: &str) {
        let Some(entry) = self.find_entry(0, self.lines.len(), 0, parent) else {
            return;
        };
        if self.is_flow_mapping(&entry) {
            self.flow_remove(&entry, key);
        } else if self.is_block_mapping(&entry) {
            let indent = self.child_indent(&entry);
            if let Some(child) = self.find_entry(entry.start + 1, entry.end, indent, key) {
                self.lines.drain(child.start..child.end);
            }
        }
    }

    fn block_upsert(&mut self, entry: &Entry, key: &str, value: &str) {
        let indent = self.child_indent(entry);
        match self.find_entry(entry.start + 1, entry.end, indent, key) {
            Some(child) => self.replace_entry_with_scalar(&child, value),
            None => {
                let line = format!("{}{}: {}", " ".repeat(indent), key, format_scalar(value));
                self.lines.insert(entry.end, line);
            }
        }
    }

    /// Find an entry with the given key at the given indent level
    fn find_entry(&self, from: usize, to: usize, indent: usize, key: &str) -> Option<Entry> {
        let mut i = from;
        while i < to {
            let line = &self.lines[i];
            if is_blank_or_comment(line) {
                i += 1;
                continue;
            }
            let line_indent = indent_of(line);
            if line_indent < indent {
                break;
            }
            if line_indent == indent {
                if let Some((found, colon_end)) = parse_key_line(line) {
                    let end = self.extent(i, indent, to);
                    if found == key {
                        return Some(Entry {
                            start: i,
                            end,
                            colon_end,
                        });
                    }
                    i = end;
                    continue;
                }
            }
            i += 1;
        }
        None
    }

    /// Exclusive end of an entry starting at `start`: all following lines
    /// that are indented deeper, including interior blanks and comments
    /// but not trailing ones
    fn extent(&self, start: usize, indent: usize, to: usize) -> usize {
        let mut end = start + 1;
        let mut i = start + 1;
        while i < to {
            let line = &self.lines[i];
            if is_blank_or_comment(line) {
                i += 1;
                continue;
            }
            if indent_of(line) <= indent {
                break;
            }
            i += 1;
            end = i;
        }
        end
    }

    /// Inline scalar text on the key line, trimmed, trailing comment removed
    fn inline_value(&self, entry: &Entry) -> &str {
        let after = &self.lines[entry.start][entry.colon_end..];
        split_value_comment(after).0
    }

    fn has_block_children(&self, entry: &Entry) -> bool {
        self.lines[entry.start + 1..entry.end]
            .iter()
            .any(|l| !is_blank_or_comment(l))
    }

    fn is_block_mapping(&self, entry: &Entry) -> bool {
        self.inline_value(entry).is_empty() && self.has_block_children(entry)
    }

    fn is_flow_mapping(&self, entry: &Entry) -> bool {
        let value = self.inline_value(entry);
        value.starts_with('{') && value.ends_with('}')
    }

    /// Indent of the entry's first child line, defaulting to two spaces
    /// past the parent when the block is empty
    fn child_indent(&self, entry: &Entry) -> usize {
        self.lines[entry.start + 1..entry.end]
            .iter()
            .find(|l| !is_blank_or_comment(l))
            .map(|l| indent_of(l))
            .unwrap_or(indent_of(&self.lines[entry.start]) + 2)
    }

    /// Replace an entry's whole value with a scalar, keeping the key text
    /// and, for single-line entries, the trailing comment
    fn replace_entry_with_scalar(&mut self, entry: &Entry, value: &str) {
        let (key_text, after) = self.lines[entry.start].split_at(entry.colon_end);
        if entry.end == entry.start + 1 {
            let (_, comment) = split_value_comment(after);
            let line = format!("{} {}{}", key_text, format_scalar(value), comment);
            self.lines[entry.start] = line;
        } else {
            let line = format!("{} {}", key_text, format_scalar(value));
            self.lines.splice(entry.start..entry.end, [line]);
        }
    }

    fn flow_upsert(&mut self, entry: &Entry, key: &str, value: &str) {
        let mut items = self.flow_items(entry);
        let formatted = format!("{}: {}", key, format_scalar(value));
        match items.iter().position(|i| flow_item_key(i) == Some(key)) {
            Some(pos) => items[pos] = formatted,
            None => items.push(formatted),
        }
        self.write_flow(entry, &items);
    }

    fn flow_remove(&mut self, entry: &Entry, key: &str) {
        let mut items = self.flow_items(entry);
        items.retain(|i| flow_item_key(i) != Some(key));
        self.write_flow(entry, &items);
    }

    fn flow_items(&self, entry: &Entry) -> Vec<String> {
        let value = self.inline_value(entry);
        let inner = &value[1..value.len() - 1];
        split_flow_items(inner)
    }

    fn write_flow(&mut self, entry: &Entry, items: &[String]) {
        let (key_text, after) = self.lines[entry.start].split_at(entry.colon_end);
        let (_, comment) = split_value_comment(after);
        let line = format!("{} {{{}}}{}", key_text, items.join(", "), comment);
        self.lines[entry.start] = line;
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))?;
        if self.final_newline {
            writeln!(f)?;
        }
        Ok(())
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse a `key:` line, returning the unquoted key and the byte offset
/// just past the colon
fn parse_key_line(line: &str) -> Option<(String, usize)> {
    let indent = indent_of(line);
    let content = &line[indent..];

    if let Some(quote) = content.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let close = content[1..].find(quote)? + 1;
        let rest = content[close + 1..].trim_start();
        if !rest.starts_with(':') {
            return None;
        }
        let colon_in_content = content.len() - rest.len();
        return Some((
            content[1..close].to_string(),
            indent + colon_in_content + 1,
        ));
    }

    let bytes = content.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') {
            let key = content[..i].trim_end();
            if key.is_empty() || key.contains(['{', '}', '[', ']', ',', '#']) {
                return None;
            }
            return Some((key.to_string(), indent + i + 1));
        }
    }
    None
}

/// Split the text after a colon into (value, trailing comment suffix)
///
/// The suffix keeps the whitespace preceding the `#` so it can be
/// reattached verbatim after the value is replaced.
fn split_value_comment(after: &str) -> (&str, &str) {
    let mut in_quote: Option<char> = None;
    let mut comment_start = None;
    let mut prev_is_space = true;
    for (i, ch) in after.char_indices() {
        match in_quote {
            Some(q) => {
                if ch == q {
                    in_quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => in_quote = Some(ch),
                '#' if prev_is_space => {
                    comment_start = Some(i);
                    break;
                }
                _ => {}
            },
        }
        prev_is_space = ch == ' ' || ch == '\t';
    }

    match comment_start {
        Some(hash) => {
            let ws_start = after[..hash].trim_end().len();
            (after[..ws_start].trim(), &after[ws_start..])
        }
        None => (after.trim(), ""),
    }
}

/// Render a scalar for insertion, quoting only when the plain form would
/// change meaning (block indicators, comments, mapping syntax)
fn format_scalar(value: &str) -> String {
    if needs_quoting(value) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

fn needs_quoting(value: &str) -> bool {
    let first_is_indicator = value.chars().next().is_some_and(|c| {
        matches!(
            c,
            '!' | '&' | '*' | '?' | '|' | '>' | '%' | '@' | '`' | '"' | '\'' | '#' | '{' | '}'
                | '[' | ']' | ','
        )
    });
    first_is_indicator
        || value == "-"
        || value.starts_with("- ")
        || value.contains(": ")
        || value.ends_with(':')
        || value.contains(" #")
        || value.trim() != value
}

/// Split the inside of a single-line flow mapping on top-level commas
fn split_flow_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;

    for ch in inner.chars() {
        if let Some(q) = in_quote {
            current.push(ch);
            if ch == q {
                in_quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                in_quote = Some(ch);
                current.push(ch);
            }
            '{' | '[' => {
                depth += 1;
                current.push(ch);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                let item = current.trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let item = current.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
    items
}

/// Key of a `name: value` flow item, quotes stripped
fn flow_item_key(item: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    for (i, ch) in item.char_indices() {
        if let Some(q) = in_quote {
            if ch == q {
                in_quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => in_quote = Some(ch),
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                return Some(item[..i].trim().trim_matches(['"', '\'']));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_is_identity() {
        let text = "name: app # the name\n\n# deps\ndependencies:\n  http: ^1.0.0\n";
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn test_roundtrip_without_final_newline() {
        let text = "name: app";
        assert_eq!(Document::parse(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_set_existing_preserves_trailing_comment() {
        let mut doc = Document::parse("version: 1.0.0 # bump me\n").unwrap();
        doc.set_top_level("version", "2.0.0");
        assert_eq!(doc.to_string(), "version: 2.0.0 # bump me\n");
    }

    #[test]
    fn test_set_new_key_appends() {
        let mut doc = Document::parse("name: app\n").unwrap();
        doc.set_top_level("homepage", "https://example.com");
        assert_eq!(doc.to_string(), "name: app\nhomepage: https://example.com\n");
    }

    #[test]
    fn test_remove_top_level_takes_block() {
        let text = "name: app\nenvironment:\n  sdk: ^3.0.0\nversion: 1.0.0\n";
        let mut doc = Document::parse(text).unwrap();
        doc.remove_top_level("environment");
        assert_eq!(doc.to_string(), "name: app\nversion: 1.0.0\n");
    }

    #[test]
    fn test_nested_upsert_keeps_sibling_lines() {
        let text = "dependencies:\n  http: ^0.13.0\n  provider: ^6.0.0 # state\n";
        let mut doc = Document::parse(text).unwrap();
        doc.set_nested("dependencies", "http", "^1.2.0");
        assert_eq!(
            doc.to_string(),
            "dependencies:\n  http: ^1.2.0\n  provider: ^6.0.0 # state\n"
        );
    }

    #[test]
    fn test_nested_insert_goes_after_last_child() {
        let text = "dependencies:\n  http: ^0.13.0\n\ndev_dependencies:\n  test: ^1.0.0\n";
        let mut doc = Document::parse(text).unwrap();
        doc.set_nested("dependencies", "provider", "^6.0.0");
        assert_eq!(
            doc.to_string(),
            "dependencies:\n  http: ^0.13.0\n  provider: ^6.0.0\n\ndev_dependencies:\n  test: ^1.0.0\n"
        );
    }

    #[test]
    fn test_nested_insert_respects_existing_indent() {
        let text = "dependencies:\n    http: ^0.13.0\n";
        let mut doc = Document::parse(text).unwrap();
        doc.set_nested("dependencies", "provider", "^6.0.0");
        assert_eq!(
            doc.to_string(),
            "dependencies:\n    http: ^0.13.0\n    provider: ^6.0.0\n"
        );
    }

    #[test]
    fn test_set_nested_creates_missing_parent() {
        let mut doc = Document::parse("name: app\n").unwrap();
        doc.set_nested("dev_dependencies", "test", "^1.21.0");
        assert_eq!(
            doc.to_string(),
            "name: app\ndev_dependencies:\n  test: ^1.21.0\n"
        );
    }

    #[test]
    fn test_set_nested_overwrites_scalar_parent() {
        let mut doc = Document::parse("dependencies: oops\n").unwrap();
        doc.set_nested("dependencies", "http", "^1.0.0");
        assert_eq!(doc.to_string(), "dependencies:\n  http: ^1.0.0\n");
    }

    #[test]
    fn test_set_nested_if_mapping_ignores_missing_parent() {
        let text = "name: app\n";
        let mut doc = Document::parse(text).unwrap();
        doc.set_nested_if_mapping("dependencies", "http", "^1.0.0");
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn test_remove_nested_replaces_complex_block() {
        let text = "dependencies:\n  local:\n    path: ../local\n  http: ^1.0.0\n";
        let mut doc = Document::parse(text).unwrap();
        doc.remove_nested("dependencies", "local");
        assert_eq!(doc.to_string(), "dependencies:\n  http: ^1.0.0\n");
    }

    #[test]
    fn test_remove_nested_missing_is_noop() {
        let text = "dependencies:\n  http: ^1.0.0\n";
        let mut doc = Document::parse(text).unwrap();
        doc.remove_nested("dependencies", "absent");
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn test_interior_comment_stays_inside_block() {
        let text = "dependencies:\n  a: 1.0.0\n  # pinned for CI\n  b: 2.0.0\nname: app\n";
        let mut doc = Document::parse(text).unwrap();
        doc.set_nested("dependencies", "c", "3.0.0");
        assert_eq!(
            doc.to_string(),
            "dependencies:\n  a: 1.0.0\n  # pinned for CI\n  b: 2.0.0\n  c: 3.0.0\nname: app\n"
        );
    }

    #[test]
    fn test_flow_mapping_upsert_and_remove() {
        let mut doc = Document::parse("dependencies: {a: ^1.0.0, b: {path: ../b}}\n").unwrap();
        doc.remove_nested("dependencies", "a");
        doc.set_nested("dependencies", "c", "^2.0.0");
        assert_eq!(
            doc.to_string(),
            "dependencies: {b: {path: ../b}, c: ^2.0.0}\n"
        );
    }

    #[test]
    fn test_constraint_values_get_quoted() {
        let mut doc = Document::parse("environment:\n  sdk: ^3.0.0\n").unwrap();
        doc.set_nested("environment", "sdk", ">=3.0.0 <4.0.0");
        assert_eq!(
            doc.to_string(),
            "environment:\n  sdk: \">=3.0.0 <4.0.0\"\n"
        );
    }

    #[test]
    fn test_quoted_key_lookup() {
        let mut doc = Document::parse("\"publish_to\": none\n").unwrap();
        doc.set_top_level("publish_to", "https://pub.example.com");
        assert_eq!(
            doc.to_string(),
            "\"publish_to\": https://pub.example.com\n"
        );
    }

    #[test]
    fn test_value_with_url_colon_is_not_a_comment_boundary() {
        let mut doc = Document::parse("homepage: https://example.com\n").unwrap();
        doc.set_top_level("homepage", "https://other.example.com");
        assert_eq!(doc.to_string(), "homepage: https://other.example.com\n");
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        assert!(Document::parse("- a\n- b\n").is_err());
        assert!(Document::parse("just a scalar\n").is_err());
    }

    #[test]
    fn test_empty_document_accepts_edits() {
        let mut doc = Document::parse("").unwrap();
        doc.set_top_level("name", "fresh");
        assert_eq!(doc.to_string(), "name: fresh");
    }
}
