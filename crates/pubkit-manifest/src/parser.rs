//! Read-path parser: YAML text to the logical [`Manifest`] model
//!
//! Tolerant by design: every field and section is optional, anything of
//! an unexpected node kind is treated as absent, and a duplicated key
//! resolves last-write-wins. The only fatal case is a document whose
//! root is not a mapping.

use crate::error::{Error, Result};
use crate::types::{Dependency, DependencySection, DependencySource, Manifest};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_yaml::Value;

/// YAML node that keeps mapping entries as an ordered pair list
///
/// `serde_yaml::Mapping` rejects duplicate keys outright, which would
/// make a manifest with a doubled entry unparseable. Collecting entries
/// as pairs keeps duplicates around so lookups can resolve them
/// last-write-wins instead.
#[derive(Debug)]
enum Node {
    Scalar(Value),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

impl<'de> serde::Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a YAML value")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::Bool(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::Number(v.into())))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::Number(v.into())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::Number(v.into())))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::String(v.to_string())))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::Null))
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
                Ok(Node::Scalar(Value::Null))
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> std::result::Result<Node, D::Error> {
                serde::Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Node, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element::<Node>()? {
                    items.push(item);
                }
                Ok(Node::Sequence(items))
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Node, A::Error> {
                let mut pairs = Vec::new();
                while let Some(entry) = map.next_entry::<Node, Node>()? {
                    pairs.push(entry);
                }
                Ok(Node::Mapping(pairs))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

/// Parse manifest text into a [`Manifest`]
///
/// # Errors
/// Returns [`Error::MalformedDocument`] if the root of the document is not
/// a mapping, or [`Error::Yaml`] if the text is not valid YAML at all.
pub fn parse(text: &str) -> Result<Manifest> {
    if text.trim().is_empty() {
        return Err(Error::MalformedDocument(
            "document root is not a mapping".to_string(),
        ));
    }
    let root: Node = serde_yaml::from_str(text)?;
    let Node::Mapping(pairs) = root else {
        return Err(Error::MalformedDocument(
            "document root is not a mapping".to_string(),
        ));
    };

    Ok(Manifest {
        name: get_string(&pairs, "name"),
        description: get_string(&pairs, "description"),
        version: get_string(&pairs, "version"),
        homepage: get_string(&pairs, "homepage"),
        repository: get_string(&pairs, "repository"),
        issue_tracker: get_string(&pairs, "issue_tracker"),
        publish_to: get_string(&pairs, "publish_to"),
        environment: get_environment(&pairs),
        dependencies: get_dependencies(&pairs, DependencySection::Dependencies),
        dev_dependencies: get_dependencies(&pairs, DependencySection::DevDependencies),
    })
}

/// Scalar rendering of a node, `None` for null and non-scalars
fn scalar_to_string(node: &Node) -> Option<String> {
    match node {
        Node::Scalar(Value::String(s)) => Some(s.clone()),
        Node::Scalar(Value::Number(n)) => Some(n.to_string()),
        Node::Scalar(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

/// Look up a key in a pair list; the last occurrence wins
fn get<'a>(pairs: &'a [(Node, Node)], key: &str) -> Option<&'a Node> {
    pairs
        .iter()
        .rev()
        .find_map(|(k, v)| (scalar_to_string(k)? == key).then_some(v))
}

fn get_string(pairs: &[(Node, Node)], key: &str) -> Option<String> {
    get(pairs, key).and_then(scalar_to_string)
}

fn get_environment(pairs: &[(Node, Node)]) -> Vec<(String, String)> {
    let Some(Node::Mapping(env)) = get(pairs, "environment") else {
        return Vec::new();
    };
    let mut out: Vec<(String, String)> = Vec::new();
    for (k, v) in env {
        let Some(key) = scalar_to_string(k) else {
            continue;
        };
        // Null values keep the key with an empty constraint
        let value = scalar_to_string(v).unwrap_or_default();
        match out.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => out.push((key, value)),
        }
    }
    out
}

fn get_dependencies(pairs: &[(Node, Node)], section: DependencySection) -> Vec<Dependency> {
    let Some(Node::Mapping(deps)) = get(pairs, section.yaml_key()) else {
        return Vec::new();
    };

    // A duplicated name keeps its first position but its last value
    let mut out: Vec<Dependency> = Vec::new();
    for (k, v) in deps {
        let Some(name) = scalar_to_string(k) else {
            continue;
        };
        let dep = classify_dependency(name, v);
        match out.iter_mut().find(|d| d.name == dep.name) {
            Some(slot) => *slot = dep,
            None => out.push(dep),
        }
    }
    out
}

/// Classify a single dependency entry by the shape of its value
///
/// Mapping values are inspected in precedence order git > path > sdk >
/// version. A mapping carrying only a `version` key is still a hosted
/// dependency, so `is_complex()` stays derived purely from the source.
fn classify_dependency(name: String, value: &Node) -> Dependency {
    match value {
        Node::Mapping(spec) => {
            if get(spec, "git").is_some() {
                // The actual git ref is not modeled; "git" is a sentinel
                return Dependency {
                    name,
                    version: "git".to_string(),
                    source: DependencySource::Git,
                };
            }
            if let Some(path) = get(spec, "path") {
                return Dependency {
                    name,
                    version: scalar_to_string(path).unwrap_or_default(),
                    source: DependencySource::Path,
                };
            }
            if let Some(sdk) = get(spec, "sdk") {
                return Dependency {
                    name,
                    version: scalar_to_string(sdk).unwrap_or_default(),
                    source: DependencySource::Sdk,
                };
            }
            let version = get(spec, "version")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| "any".to_string());
            Dependency {
                name,
                version,
                source: DependencySource::Hosted,
            }
        }
        other => {
            let version = match scalar_to_string(other) {
                Some(s) if !s.is_empty() => s,
                // Null, empty, or any non-scalar kind means "any version"
                _ => "any".to_string(),
            };
            Dependency {
                name,
                version,
                source: DependencySource::Hosted,
            }
        }
    }
}
