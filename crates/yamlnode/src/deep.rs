//! Depth-first key search over mappings and sequences.
//!
//! The search visits mapping entries in order, testing each key before
//! descending into its value, and stops at the first key that matches. Keys
//! are only matched inside mappings; sequences are descended into but have no
//! keys of their own.
//!
//! The walk keeps its own frame stack instead of recursing, so deeply nested
//! documents cannot exhaust the call stack.

use crate::{Mapping, ValuePath, Value};
use indexmap::map::Iter as EntryIter;
use std::iter::Enumerate;
use std::slice::Iter as ItemIter;

/// A key located by deep search.
#[derive(Debug, Clone)]
pub struct DeepMatch<'a> {
    /// The matched key
    pub key: &'a str,
    /// Value stored under the key
    pub value: &'a Value,
    /// The mapping that holds the key
    pub parent: &'a Mapping,
    /// Location of `parent`, relative to where the search started
    pub parent_path: ValuePath,
}

impl DeepMatch<'_> {
    /// Location of the matched value, relative to where the search started.
    pub fn path(&self) -> ValuePath {
        self.parent_path.key(self.key)
    }
}

/// Deep search rooted at a mapping.
#[derive(Debug, Clone, Copy)]
pub struct DeepDict<'a> {
    entries: &'a Mapping,
}

impl<'a> DeepDict<'a> {
    pub fn new(entries: &'a Mapping) -> Self {
        Self { entries }
    }

    pub fn find(&self, key: &str) -> Option<DeepMatch<'a>> {
        let mut stack = vec![Frame::entries(ValuePath::root(), self.entries)];
        walk(&mut stack, key)
    }

    pub fn deepget(&self, key: &str) -> Option<&'a Value> {
        self.find(key).map(|m| m.value)
    }

    /// The mapping that holds `key`, rather than its value.
    pub fn deepget_parent(&self, key: &str) -> Option<&'a Mapping> {
        self.find(key).map(|m| m.parent)
    }
}

/// Deep search rooted at a sequence.
#[derive(Debug, Clone, Copy)]
pub struct DeepList<'a> {
    items: &'a [Value],
}

impl<'a> DeepList<'a> {
    pub fn new(items: &'a [Value]) -> Self {
        Self { items }
    }

    pub fn find(&self, key: &str) -> Option<DeepMatch<'a>> {
        let mut stack = vec![Frame::items(ValuePath::root(), self.items)];
        walk(&mut stack, key)
    }

    pub fn deepget(&self, key: &str) -> Option<&'a Value> {
        self.find(key).map(|m| m.value)
    }

    pub fn deepget_parent(&self, key: &str) -> Option<&'a Mapping> {
        self.find(key).map(|m| m.parent)
    }
}

/// Deep search over any value. Scalars contain no keys.
pub fn deep_find<'a>(value: &'a Value, key: &str) -> Option<DeepMatch<'a>> {
    match value {
        Value::Mapping(entries) => DeepDict::new(entries).find(key),
        Value::Sequence(items) => DeepList::new(items).find(key),
        Value::Scalar(_) => None,
    }
}

/// A container whose children are partially visited.
enum Frame<'a> {
    Entries {
        path: ValuePath,
        mapping: &'a Mapping,
        iter: EntryIter<'a, String, Value>,
    },
    Items {
        path: ValuePath,
        iter: Enumerate<ItemIter<'a, Value>>,
    },
}

impl<'a> Frame<'a> {
    fn entries(path: ValuePath, mapping: &'a Mapping) -> Self {
        Frame::Entries {
            path,
            mapping,
            iter: mapping.iter(),
        }
    }

    fn items(path: ValuePath, items: &'a [Value]) -> Self {
        Frame::Items {
            path,
            iter: items.iter().enumerate(),
        }
    }

    fn for_value(path: ValuePath, value: &'a Value) -> Option<Self> {
        match value {
            Value::Mapping(entries) => Some(Frame::entries(path, entries)),
            Value::Sequence(items) => Some(Frame::items(path, items)),
            Value::Scalar(_) => None,
        }
    }
}

fn walk<'a>(stack: &mut Vec<Frame<'a>>, key: &str) -> Option<DeepMatch<'a>> {
    while let Some(frame) = stack.last_mut() {
        let (child_path, child) = match frame {
            Frame::Entries {
                path,
                mapping,
                iter,
            } => {
                let Some((k, v)) = iter.next() else {
                    stack.pop();
                    continue;
                };
                if k == key {
                    return Some(DeepMatch {
                        key: k.as_str(),
                        value: v,
                        parent: *mapping,
                        parent_path: path.clone(),
                    });
                }
                if v.is_scalar() {
                    continue;
                }
                (path.key(k.as_str()), v)
            }
            Frame::Items { path, iter } => {
                let Some((index, v)) = iter.next() else {
                    stack.pop();
                    continue;
                };
                if v.is_scalar() {
                    continue;
                }
                (path.index(index), v)
            }
        };

        stack.extend(Frame::for_value(child_path, child));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamlnode_document::parse;

    #[test]
    fn test_finds_key_at_depth() {
        let doc = parse("a: {b: {target: 42}}").unwrap();
        let found = deep_find(&doc, "target").unwrap();
        assert_eq!(found.value.as_i64(), Some(42));
        assert_eq!(found.path().to_string(), "$.a.b.target");
        assert_eq!(found.parent_path.to_string(), "$.a.b");
    }

    #[test]
    fn test_missing_key() {
        let doc = parse("a: {b: {target: 42}}").unwrap();
        assert!(deep_find(&doc, "missing").is_none());
    }

    #[test]
    fn test_parent_is_enclosing_mapping() {
        let doc = parse("a: {target: 1, other: 2}").unwrap();
        let entries = doc.as_mapping().unwrap();
        let parent = DeepDict::new(entries).deepget_parent("target").unwrap();
        assert_eq!(parent.len(), 2);
        assert_eq!(parent.get("other").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn test_descends_before_later_siblings() {
        // pre-order: the nested match under `a` precedes the sibling key
        let doc = parse("a: {target: 1}\ntarget: 2").unwrap();
        assert_eq!(deep_find(&doc, "target").unwrap().value.as_i64(), Some(1));
    }

    #[test]
    fn test_key_before_its_own_value() {
        let doc = parse("target: {target: 2}").unwrap();
        let found = deep_find(&doc, "target").unwrap();
        assert!(found.value.is_mapping());
        assert!(found.parent_path.is_root());
    }

    #[test]
    fn test_searches_through_sequences() {
        let doc = parse("- [1, 2]\n- - x: 1\n  - y: {target: ok}\n").unwrap();
        let items = doc.as_sequence().unwrap();
        let found = DeepList::new(items).find("target").unwrap();
        assert_eq!(found.value.as_str(), Some("ok"));
        assert_eq!(found.path().to_string(), "$[1][1].y.target");
    }

    #[test]
    fn test_first_match_wins_across_branches() {
        let doc = parse("a: {x: {}}\nb: {target: first}\nc: {target: second}").unwrap();
        assert_eq!(
            deep_find(&doc, "target").unwrap().value.as_str(),
            Some("first")
        );
    }

    #[test]
    fn test_scalar_has_no_keys() {
        assert!(deep_find(&Value::from("target"), "target").is_none());
    }

    #[test]
    fn test_deeply_nested_document() {
        let mut doc = Value::from("bottom");
        for _ in 0..2_000 {
            doc = [("level", doc)].into_iter().collect();
        }
        doc = [("wrapper", doc)].into_iter().collect();
        let found = deep_find(&doc, "level").unwrap();
        assert_eq!(found.path().to_string(), "$.wrapper.level");
        assert!(deep_find(&doc, "absent").is_none());
    }
}
