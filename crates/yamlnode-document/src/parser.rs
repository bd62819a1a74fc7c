//! YAML parser that builds generic [`Value`] trees.

use crate::{Error, Location, Mapping, Result, Scalar, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse YAML from a string into a generic document tree.
///
/// Only the first document of a multi-document stream is read. Empty input
/// yields a null value.
///
/// # Example
///
/// ```rust
/// use yamlnode_document::parse;
///
/// let doc = parse("mesh: {cells: 100}").unwrap();
/// assert!(doc.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the text is not well-formed YAML, or if it uses a
/// structure the document model cannot hold (such as a mapping used as a key).
pub fn parse(content: &str) -> Result<Value> {
    parse_impl(content, None)
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is included in error locations.
///
/// # Example
///
/// ```rust
/// use yamlnode_document::{parse_named, Error};
///
/// let err = parse_named("a: [1, 2", "case.yaml").unwrap_err();
/// assert!(matches!(err, Error::Parse { .. }));
/// ```
pub fn parse_named(content: &str, filename: &str) -> Result<Value> {
    parse_impl(content, Some(filename))
}

/// Read a file and parse its content.
///
/// I/O failures are reported as [`Error::Io`]; parse failures are returned as
/// produced by [`parse_named`].
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Loaded document");
    parse_named(&content, &path.display().to_string())
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<Value> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = DocumentBuilder::new();

    let outcome = parser
        .load(&mut builder, false) // false = single document only
        .map_err(Error::from)
        .and_then(|()| builder.result());

    match filename {
        Some(name) => outcome.map_err(|e| e.in_file(name)),
        None => outcome,
    }
}

/// Builder that implements MarkedEventReceiver to construct a [`Value`].
struct DocumentBuilder {
    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed values by anchor id, for alias expansion
    anchors: HashMap<usize, Value>,

    /// The completed root value
    root: Option<Value>,

    /// First structural error; later events are ignored once set
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        anchor: usize,
        items: Vec<Value>,
    },

    Mapping {
        anchor: usize,
        entries: Mapping,
        /// Key waiting for its value
        pending_key: Option<(String, Marker)>,
        /// Keys filled in by a `<<` merge and not yet set explicitly
        merged: HashSet<String>,
    },
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or_default()),
        }
    }

    fn fail(&mut self, message: impl Into<String>, marker: &Marker) {
        if self.error.is_none() {
            self.error = Some(Error::InvalidStructure {
                message: message.into(),
                location: Location::from_marker(marker),
            });
        }
    }

    /// True when the next completed value is a mapping key.
    fn expecting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(BuildNode::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    fn record_anchor(&mut self, anchor: usize, value: &Value) {
        if anchor != 0 {
            self.anchors.insert(anchor, value.clone());
        }
    }

    fn push_complete(&mut self, value: Value, marker: Marker) {
        let Some(top) = self.stack.last_mut() else {
            // This is the root
            if self.root.is_none() {
                self.root = Some(value);
            }
            return;
        };

        let bad_key = match top {
            BuildNode::Sequence { items, .. } => {
                items.push(value);
                None
            }
            BuildNode::Mapping {
                entries,
                pending_key,
                merged,
                ..
            } => match (pending_key.take(), value) {
                (Some((key, key_marker)), value) if key == MERGE_KEY => {
                    match merge_sources(value) {
                        Ok(sources) => {
                            for source in sources {
                                merge_into(entries, merged, source);
                            }
                        }
                        Err(value) => {
                            tracing::warn!(
                                line = key_marker.line(),
                                found = value.kind(),
                                "Merge key needs a mapping or a sequence of mappings, kept as a plain key"
                            );
                            entries.insert(key, value);
                        }
                    }
                    None
                }
                (Some((key, key_marker)), value) => {
                    // explicit keys override merged ones without a warning
                    if !merged.remove(&key) && entries.contains_key(&key) {
                        tracing::warn!(
                            key = %key,
                            line = key_marker.line(),
                            "Duplicate mapping key, later value wins"
                        );
                    }
                    entries.insert(key, value);
                    None
                }
                (None, Value::Scalar(scalar)) => {
                    *pending_key = Some((scalar.to_string(), marker));
                    None
                }
                (None, other) => {
                    *pending_key = Some((String::new(), marker));
                    Some(other.kind())
                }
            },
        };

        if let Some(kind) = bad_key {
            self.fail(format!("a {} cannot be used as a mapping key", kind), &marker);
        }
    }
}

impl MarkedEventReceiver for DocumentBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(text, style, anchor, tag) => {
                let value = if self.expecting_key() {
                    // Keys keep their source spelling
                    Value::Scalar(Scalar::String(text))
                } else {
                    scalar_value(text, style, tag.as_ref())
                };
                self.record_anchor(anchor, &value);
                self.push_complete(value, marker);
            }

            Event::SequenceStart(anchor, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    anchor,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(BuildNode::Sequence { anchor, items }) => {
                    let value = Value::Sequence(items);
                    self.record_anchor(anchor, &value);
                    self.push_complete(value, marker);
                }
                _ => self.fail("sequence end without a matching start", &marker),
            },

            Event::MappingStart(anchor, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    anchor,
                    entries: Mapping::new(),
                    pending_key: None,
                    merged: HashSet::new(),
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Mapping {
                    anchor, entries, ..
                }) => {
                    let value = Value::Mapping(entries);
                    self.record_anchor(anchor, &value);
                    self.push_complete(value, marker);
                }
                _ => self.fail("mapping end without a matching start", &marker),
            },

            Event::Alias(anchor) => {
                let value = match self.anchors.get(&anchor) {
                    Some(value) => value.clone(),
                    None => {
                        tracing::warn!(
                            anchor,
                            line = marker.line(),
                            "Alias refers to an unknown anchor, using null"
                        );
                        Value::null()
                    }
                };
                self.push_complete(value, marker);
            }

            // Stream and document boundaries carry no data
            _ => {}
        }
    }
}

const MERGE_KEY: &str = "<<";

/// Mappings a `<<` value merges, in precedence order. Anything else is
/// handed back unchanged.
fn merge_sources(value: Value) -> std::result::Result<Vec<Mapping>, Value> {
    match value {
        Value::Mapping(entries) => Ok(vec![entries]),
        Value::Sequence(items) if items.iter().all(Value::is_mapping) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Mapping(entries) => Some(entries),
                _ => None,
            })
            .collect()),
        other => Err(other),
    }
}

/// Add `source` entries whose keys the mapping does not hold yet.
fn merge_into(entries: &mut Mapping, merged: &mut HashSet<String>, source: Mapping) {
    for (key, value) in source {
        if !entries.contains_key(&key) {
            merged.insert(key.clone());
            entries.insert(key, value);
        }
    }
}

/// Type a scalar event.
///
/// Plain scalars go through YAML core-schema inference; anything quoted,
/// block-styled or tagged `!!str` stays a string.
fn scalar_value(text: String, style: TScalarStyle, tag: Option<&Tag>) -> Value {
    let forced_string = tag.is_some_and(|t| t.suffix == "str");
    if forced_string || !matches!(style, TScalarStyle::Plain) {
        return Value::Scalar(Scalar::String(text));
    }

    let scalar = match Yaml::from_str(&text) {
        Yaml::Integer(i) => Scalar::Integer(i),
        Yaml::Boolean(b) => Scalar::Bool(b),
        Yaml::Null => Scalar::Null,
        real @ Yaml::Real(_) => match real.as_f64() {
            Some(f) => Scalar::Float(f),
            None => Scalar::String(text),
        },
        _ => Scalar::String(text),
    };
    Value::Scalar(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        let doc = parse("hello").unwrap();
        assert_eq!(doc.as_str(), Some("hello"));
    }

    #[test]
    fn test_parse_integer() {
        let doc = parse("42").unwrap();
        assert_eq!(doc.as_i64(), Some(42));
    }

    #[test]
    fn test_parse_boolean() {
        let doc = parse("true").unwrap();
        assert_eq!(doc.as_bool(), Some(true));
    }

    #[test]
    fn test_parse_float() {
        let doc = parse("2.5").unwrap();
        assert_eq!(doc.as_f64(), Some(2.5));
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        let doc = parse("a: '42'\nb: \"true\"\nc: 42").unwrap();
        assert_eq!(doc.get_key("a").and_then(Value::as_str), Some("42"));
        assert_eq!(doc.get_key("b").and_then(Value::as_str), Some("true"));
        assert_eq!(doc.get_key("c").and_then(Value::as_i64), Some(42));
    }

    #[test]
    fn test_str_tag_stays_string() {
        let doc = parse("version: !!str 1.10").unwrap();
        assert_eq!(doc.get_key("version").and_then(Value::as_str), Some("1.10"));
    }

    #[test]
    fn test_empty_value_is_null() {
        let doc = parse("a:\nb: ~").unwrap();
        assert!(doc.get_key("a").unwrap().is_null());
        assert!(doc.get_key("b").unwrap().is_null());
    }

    #[test]
    fn test_empty_document_is_null() {
        assert!(parse("").unwrap().is_null());
    }

    #[test]
    fn test_parse_array() {
        let doc = parse("[1, 2, 3]").unwrap();
        let items = doc.as_sequence().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_i64(), Some(1));
        assert_eq!(items[2].as_i64(), Some(3));
    }

    #[test]
    fn test_keys_keep_order() {
        let doc = parse("zeta: 1\nalpha: 2\nmid: 3").unwrap();
        let keys: Vec<&String> = doc.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_non_string_keys_keep_spelling() {
        let doc = parse("1.0: a\n2: b\nnull: c").unwrap();
        let keys: Vec<&String> = doc.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["1.0", "2", "null"]);
    }

    #[test]
    fn test_nested_structure() {
        let doc = parse(
            r#"
project:
  title: My Project
  authors:
    - Alice
    - Bob
"#,
        )
        .unwrap();

        let project = doc.get_key("project").unwrap();
        assert!(project.is_mapping());
        let authors = project.get_key("authors").unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors.get_index(1).and_then(Value::as_str), Some("Bob"));
    }

    #[test]
    fn test_duplicate_key_later_wins() {
        let doc = parse("a: 1\nb: 2\na: 3").unwrap();
        let entries = doc.as_mapping().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get_index(0).map(|(k, _)| k.as_str()), Some("a"));
        assert_eq!(doc.get_key("a").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn test_alias_expands_anchor() {
        let doc = parse("base: &b {x: 1}\ncopy: *b").unwrap();
        assert_eq!(doc.get_key("copy"), doc.get_key("base"));
    }

    #[test]
    fn test_merge_key_fills_missing_entries() {
        let doc = parse("base: &b {x: 1, y: 2}\nderived:\n  <<: *b\n  y: 3").unwrap();
        assert_eq!(doc.get_key("derived"), Some(&parse("{x: 1, y: 3}").unwrap()));
    }

    #[test]
    fn test_merge_key_keeps_earlier_explicit_entries() {
        let doc = parse("base: &b {x: 1, y: 2}\nderived:\n  y: 3\n  <<: *b").unwrap();
        let derived = doc.get_key("derived").unwrap();
        assert_eq!(derived.get_key("y").and_then(Value::as_i64), Some(3));
        assert_eq!(derived.get_key("x").and_then(Value::as_i64), Some(1));
        assert!(derived.get_key("<<").is_none());
    }

    #[test]
    fn test_merge_key_sequence_prefers_first_mapping() {
        let doc = parse("a: &a {k: 1}\nb: &b {k: 2, m: 3}\nc:\n  <<: [*a, *b]").unwrap();
        assert_eq!(doc.get_key("c"), Some(&parse("{k: 1, m: 3}").unwrap()));
    }

    #[test]
    fn test_merge_key_with_scalar_stays_literal() {
        let doc = parse("<<: text").unwrap();
        assert_eq!(doc.get_key("<<").and_then(Value::as_str), Some("text"));
    }

    #[test]
    fn test_complex_key_is_rejected() {
        let err = parse("? [a, b]\n: value").unwrap_err();
        assert!(matches!(err, Error::InvalidStructure { .. }));
    }

    #[test]
    fn test_only_first_document() {
        let doc = parse("a: 1\n---\nb: 2\n").unwrap();
        assert!(doc.get_key("a").is_some());
        assert!(doc.get_key("b").is_none());
    }

    #[test]
    fn test_syntax_error() {
        let err = parse("a: [1, 2").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_named_attaches_file() {
        let err = parse_named("a: [1, 2", "case.yaml").unwrap_err();
        match err {
            Error::Parse { location, .. } => {
                assert_eq!(location.file.as_deref(), Some("case.yaml"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
