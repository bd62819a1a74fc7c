//! Nodes: named views over single-key mappings of a document.
//!
//! A [`Node`] is built from `{label: content}` and expands `content` into
//! named attributes, each of which is a stored leaf, a child node, or a
//! [`NodeCollection`]. Nodes hold [`ValuePath`]s rather than data; reading
//! goes through [`NodeRef`] and writing through [`NodeMut`], both of which
//! pair a node with the document it was built from.

use crate::classify::{describe_non_node, is_node, is_plain_data};
use crate::collection::{CollectionRef, NodeCollection};
use crate::deep::deep_find;
use crate::{Error, Mapping, Result, Scalar, Value, ValuePath};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::ops::Index;

static NULL: Value = Value::Scalar(Scalar::Null);
static EMPTY_SEQUENCE: Value = Value::Sequence(Vec::new());
static EMPTY_MAPPING: Lazy<Value> = Lazy::new(Value::empty_mapping);

/// One parsed child of a node.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// Plain data, stored where the document holds it
    Leaf(ValuePath),
    /// A nested node
    Node(Box<Node>),
    /// Same-labeled nodes found in a sequence
    Collection(NodeCollection),
}

/// A parsed `{label: content}` entry of a document.
#[derive(Debug, Clone)]
pub struct Node {
    label: String,
    /// Location of `content`
    content: ValuePath,
    /// Location of the mapping or sequence that holds this node's entry
    parent_container: ValuePath,
    attributes: IndexMap<String, Attribute>,
}

/// Settings shared by one construction pass.
pub(crate) struct BuildContext<'d> {
    pub(crate) document: &'d Value,
    pub(crate) max_depth: usize,
}

impl Node {
    /// Build a node over the single-key mapping found at `path` in `document`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNode`] if the value at `path` is not a single-key mapping
    /// whose value is structured data; [`Error::DanglingPath`] if there is no
    /// value at `path`.
    pub fn build(document: &Value, path: &ValuePath) -> Result<Node> {
        let cx = BuildContext {
            document,
            max_depth: crate::tree::DEFAULT_MAX_DEPTH,
        };
        Node::from_mapping(&cx, path.clone(), 0)
    }

    pub(crate) fn from_mapping(cx: &BuildContext<'_>, path: ValuePath, depth: usize) -> Result<Node> {
        let value = path
            .resolve(cx.document)
            .ok_or_else(|| Error::DanglingPath { path: path.clone() })?;
        let label = match value {
            Value::Mapping(entries) if is_node(value) => entries.keys().next().cloned(),
            _ => None,
        };
        let Some(label) = label else {
            return Err(Error::InvalidNode {
                found: describe_non_node(value),
                path,
            });
        };
        Node::from_entry(cx, path, label, depth)
    }

    fn from_entry(
        cx: &BuildContext<'_>,
        container: ValuePath,
        label: String,
        depth: usize,
    ) -> Result<Node> {
        let content = container.key(label.as_str());
        if depth > cx.max_depth {
            return Err(Error::NestingTooDeep {
                max_depth: cx.max_depth,
                path: content,
            });
        }

        let mut node = Node {
            label,
            content,
            parent_container: container,
            attributes: IndexMap::new(),
        };
        node.parse(cx, depth)?;
        Ok(node)
    }

    /// A node with no attributes over `{label: {}}` at the document root.
    pub(crate) fn empty(label: &str) -> Node {
        Node {
            label: label.to_string(),
            content: ValuePath::root().key(label),
            parent_container: ValuePath::root(),
            attributes: IndexMap::new(),
        }
    }

    fn parse(&mut self, cx: &BuildContext<'_>, depth: usize) -> Result<()> {
        let content = self.content.resolve(cx.document).ok_or_else(|| Error::DanglingPath {
            path: self.content.clone(),
        })?;

        // A content that is itself a node wraps exactly one child
        if is_node(content) {
            let child = Node::from_mapping(cx, self.content.clone(), depth + 1)?;
            self.attributes
                .insert(child.label.clone(), Attribute::Node(Box::new(child)));
            return Ok(());
        }

        match content {
            Value::Sequence(items) => self.parse_sequence(cx, items, depth),
            Value::Mapping(entries) => self.parse_mapping(cx, entries, depth),
            Value::Scalar(_) => {
                tracing::warn!(
                    label = %self.label,
                    path = %self.content,
                    "Node content is plain data, no attributes created"
                );
                Ok(())
            }
        }
    }

    fn parse_sequence(&mut self, cx: &BuildContext<'_>, items: &[Value], depth: usize) -> Result<()> {
        let mut groups: IndexMap<String, Vec<Node>> = IndexMap::new();
        for (index, item) in items.iter().enumerate() {
            if is_node(item) {
                let child = Node::from_mapping(cx, self.content.index(index), depth + 1)?;
                groups.entry(child.label.clone()).or_default().push(child);
            }
        }

        for (label, nodes) in groups {
            let collection = NodeCollection::create(label.as_str(), nodes);
            self.attributes
                .insert(label, Attribute::Collection(collection));
        }
        Ok(())
    }

    fn parse_mapping(&mut self, cx: &BuildContext<'_>, entries: &Mapping, depth: usize) -> Result<()> {
        for (key, value) in entries {
            let attribute = if is_plain_data(value) {
                Attribute::Leaf(self.content.key(key.as_str()))
            } else {
                let child = Node::from_entry(cx, self.content.clone(), key.clone(), depth + 1)?;
                Attribute::Node(Box::new(child))
            };
            self.attributes.insert(key.clone(), attribute);
        }
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Location of this node's content in the document.
    pub fn path(&self) -> &ValuePath {
        &self.content
    }

    pub fn parent_path(&self) -> &ValuePath {
        &self.parent_container
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Find the node whose content lives at `path`, searching this node and
    /// everything below it.
    pub fn find(&self, path: &ValuePath) -> Option<&Node> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if &node.content == path {
                return Some(node);
            }
            if !path.starts_with(&node.content) {
                continue;
            }
            for attribute in node.attributes.values() {
                match attribute {
                    Attribute::Leaf(_) => {}
                    Attribute::Node(child) => stack.push(child.as_ref()),
                    Attribute::Collection(collection) => stack.extend(collection.nodes()),
                }
            }
        }
        None
    }
}

/// Key for shallow lookups: a name or a sequence position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    Name(&'k str),
    Index(usize),
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(name: &'k str) -> Self {
        Key::Name(name)
    }
}

impl<'k> From<&'k String> for Key<'k> {
    fn from(name: &'k String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Result of a shallow lookup.
#[derive(Debug, Clone)]
pub enum Item<'a> {
    /// Raw document data
    Value(&'a Value),
    Node(NodeRef<'a>),
    Collection(CollectionRef<'a>),
}

impl<'a> Item<'a> {
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Item::Value(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeRef<'a>> {
        match self {
            Item::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn into_collection(self) -> Option<CollectionRef<'a>> {
        match self {
            Item::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Document data behind this item: the value itself, or a node's content.
    ///
    /// Collections have no single location and return `None`.
    pub fn content(&self) -> Option<&'a Value> {
        match self {
            Item::Value(value) => Some(*value),
            Item::Node(node) => Some(node.content()),
            Item::Collection(_) => None,
        }
    }
}

/// Read view of a node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a Value,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(document: &'a Value, node: &'a Node) -> Self {
        Self { document, node }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn label(&self) -> &'a str {
        &self.node.label
    }

    /// Location of this node's content in the tree's document.
    pub fn path(&self) -> &'a ValuePath {
        &self.node.content
    }

    /// The wrapped content; null if the document no longer has it.
    pub fn content(&self) -> &'a Value {
        self.node.content.resolve(self.document).unwrap_or(&NULL)
    }

    /// The mapping or sequence that holds this node's `{label: content}` entry.
    pub fn parent_container(&self) -> &'a Value {
        self.node
            .parent_container
            .resolve(self.document)
            .unwrap_or(&NULL)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.node.attributes.keys().map(String::as_str)
    }

    /// A parsed child by its original key.
    pub fn attribute(&self, name: &str) -> Option<Item<'a>> {
        self.node
            .attributes
            .get(name)
            .map(|attribute| self.wrap(attribute))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'a str, Item<'a>)> + use<'a> {
        let this = *self;
        self.node
            .attributes
            .iter()
            .map(move |(name, attribute)| (name.as_str(), this.wrap(attribute)))
    }

    pub fn child(&self, name: &str) -> Option<NodeRef<'a>> {
        self.attribute(name).and_then(|item| item.as_node())
    }

    pub fn collection(&self, name: &str) -> Option<CollectionRef<'a>> {
        self.attribute(name).and_then(Item::into_collection)
    }

    /// A leaf attribute.
    pub fn leaf(&self, name: &str) -> Option<&'a Value> {
        match self.node.attributes.get(name)? {
            Attribute::Leaf(path) => path.resolve(self.document),
            _ => None,
        }
    }

    fn wrap(&self, attribute: &'a Attribute) -> Item<'a> {
        match attribute {
            Attribute::Leaf(path) => Item::Value(path.resolve(self.document).unwrap_or(&NULL)),
            Attribute::Node(child) => Item::Node(NodeRef::new(self.document, child)),
            Attribute::Collection(collection) => {
                Item::Collection(CollectionRef::new(self.document, collection))
            }
        }
    }

    /// Shallow lookup.
    ///
    /// Mapping content: `Name` returns the raw value stored under the key.
    /// Sequence content: `Name` returns the parsed attribute of that name and
    /// `Index` the element at that position. Anything else is `None`.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Option<Item<'a>> {
        match (self.content(), key.into()) {
            (Value::Mapping(entries), Key::Name(name)) => entries.get(name).map(Item::Value),
            (Value::Sequence(_), Key::Name(name)) => self.attribute(name),
            (Value::Sequence(items), Key::Index(index)) => items.get(index).map(Item::Value),
            _ => None,
        }
    }

    /// Shallow lookup with an empty fallback.
    ///
    /// A missing mapping key yields an empty mapping and a missing sequence
    /// position an empty sequence; other misses yield null.
    pub fn get_or_empty<'k>(&self, key: impl Into<Key<'k>>) -> Item<'a> {
        let key = key.into();
        if let Some(item) = self.get(key) {
            return item;
        }
        match (self.content(), key) {
            (Value::Mapping(_), Key::Name(_)) => Item::Value(&*EMPTY_MAPPING),
            (Value::Sequence(_), Key::Index(_)) => Item::Value(&EMPTY_SEQUENCE),
            _ => Item::Value(&NULL),
        }
    }

    /// Shallow lookup narrowed to plain document data.
    pub fn value<'k>(&self, key: impl Into<Key<'k>>) -> Option<&'a Value> {
        self.get(key).and_then(|item| item.as_value())
    }

    pub fn value_or<'k>(&self, key: impl Into<Key<'k>>, default: &'a Value) -> &'a Value {
        self.value(key).unwrap_or(default)
    }

    /// Element of a sequence-backed node.
    pub fn item(&self, index: usize) -> Option<&'a Value> {
        self.content().get_index(index)
    }

    /// First value stored under `key` anywhere below this node.
    ///
    /// Entries are visited depth-first in document order; a key is tested
    /// before its own value is searched.
    pub fn deepget(&self, key: &str) -> Option<&'a Value> {
        deep_find(self.content(), key).map(|found| found.value)
    }

    pub fn deepget_or(&self, key: &str, default: &'a Value) -> &'a Value {
        self.deepget(key).unwrap_or(default)
    }

    /// The mapping that holds the first deep match of `key`.
    pub fn deepget_parent(&self, key: &str) -> Option<&'a Mapping> {
        deep_find(self.content(), key).map(|found| found.parent)
    }

    /// Location in the tree's document of the first deep match of `key`.
    pub fn deepget_path(&self, key: &str) -> Option<ValuePath> {
        deep_find(self.content(), key).map(|found| self.node.content.join(&found.path()))
    }

    /// First value found for any of `keys`, trying them in order.
    pub fn deepget_any<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Option<&'a Value> {
        keys.into_iter().find_map(|key| self.deepget(key.as_ref()))
    }

    pub fn has<'k>(&self, key: impl Into<Key<'k>>) -> bool {
        self.get(key).is_some()
    }

    pub fn deephas(&self, key: &str) -> bool {
        deep_find(self.content(), key).is_some()
    }

    pub fn has_any<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        keys.into_iter().any(|key| self.has(key.as_ref()))
    }

    pub fn deephas_any<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        keys.into_iter().any(|key| self.deephas(key.as_ref()))
    }

    /// The first of `keys` present anywhere below this node.
    pub fn which_has<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Option<S> {
        keys.into_iter().find(|key| self.deephas(key.as_ref()))
    }

    /// Render this node's content as YAML.
    ///
    /// Only the node's own subtree is written; its label and siblings are not.
    pub fn serialize(&self) -> Result<String> {
        Ok(yamlnode_document::serialize(self.content())?)
    }
}

impl Index<usize> for NodeRef<'_> {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self.item(index) {
            Some(value) => value,
            None => panic!(
                "index {} out of range for {} content of node '{}'",
                index,
                self.content().kind(),
                self.label()
            ),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("label", &self.label())
            .field("path", &self.path().to_string())
            .field("content", self.content())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.serialize().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Write view of a node.
///
/// Writes go straight into the tree's document. The node's parsed attributes
/// are not rebuilt; call [`Tree::reparse`](crate::Tree::reparse) when new
/// structure needs to become addressable.
pub struct NodeMut<'a> {
    document: &'a mut Value,
    node: &'a Node,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(document: &'a mut Value, node: &'a Node) -> Self {
        Self { document, node }
    }

    /// Read access to the same node.
    pub fn view(&self) -> NodeRef<'_> {
        NodeRef::new(&*self.document, self.node)
    }

    pub fn label(&self) -> &'a str {
        &self.node.label
    }

    /// Move to the child node stored under `name`.
    pub fn into_child(self, name: &str) -> Option<NodeMut<'a>> {
        match self.node.attributes.get(name)? {
            Attribute::Node(child) => Some(NodeMut::new(self.document, child)),
            _ => None,
        }
    }

    /// Move to member `index` of the collection stored under `name`.
    pub fn into_member(self, name: &str, index: usize) -> Option<NodeMut<'a>> {
        let Attribute::Collection(collection) = self.node.attributes.get(name)? else {
            return None;
        };
        let member = collection.nodes().get(index)?;
        Some(NodeMut::new(self.document, member))
    }

    /// Store `value` under `key` in this node's content mapping.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let node = self.node;
        let path = &node.content;
        let content = path
            .resolve_mut(self.document)
            .ok_or_else(|| Error::DanglingPath { path: path.clone() })?;
        let found = content.kind();
        let entries = content.as_mapping_mut().ok_or_else(|| Error::NotAMapping {
            path: path.clone(),
            found,
        })?;
        entries.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Replace each key's first deep match below this node.
    ///
    /// Pairs are applied in order, each searched after the previous write.
    /// Keys that are not found are skipped with a warning. Returns the number
    /// of values written.
    pub fn deepset<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> usize
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut written = 0;
        for (key, value) in pairs {
            let key = key.as_ref();
            if write_deep(self.document, self.node, key, value.into()) {
                written += 1;
            } else {
                tracing::warn!(
                    key,
                    node = %self.node.content,
                    "Deep assignment skipped, key not found"
                );
            }
        }
        written
    }

    /// Like [`deepset`](Self::deepset), but every key must exist.
    ///
    /// Pairs are applied to a copy of the document, which replaces the
    /// tree's document only once every write has landed. On error the
    /// document is unchanged.
    pub fn try_deepset<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<usize>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut staged: Value = (*self.document).clone();
        let mut written = 0;
        for (key, value) in pairs {
            let key = key.as_ref();
            if !write_deep(&mut staged, self.node, key, value.into()) {
                return Err(self.key_not_found(key));
            }
            written += 1;
        }
        *self.document = staged;
        Ok(written)
    }

    fn key_not_found(&self, key: &str) -> Error {
        Error::KeyNotFound {
            key: key.to_string(),
            path: self.node.content.clone(),
        }
    }
}

/// Replace the first deep match of `key` below `node` in `document`.
fn write_deep(document: &mut Value, node: &Node, key: &str, value: Value) -> bool {
    let Some(target) = NodeRef::new(&*document, node).deepget_path(key) else {
        return false;
    };
    let Some(parent) = target.parent() else {
        return false;
    };
    match parent.resolve_mut(document).and_then(Value::as_mapping_mut) {
        Some(entries) => {
            entries.insert(key.to_string(), value);
            true
        }
        None => false,
    }
}

impl fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMut")
            .field("label", &self.label())
            .field("path", &self.node.content.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree;
    use yamlnode_document::parse;

    #[test]
    fn test_build_takes_label_from_the_only_key() {
        let doc = parse("mesh: {cells: 10}").unwrap();
        let node = Node::build(&doc, &ValuePath::root()).unwrap();
        assert_eq!(node.label(), "mesh");
        assert_eq!(node.path().to_string(), "$.mesh");
        assert!(node.parent_path().is_root());
    }

    #[test]
    fn test_build_rejects_non_nodes() {
        for text in ["a: 1", "a: {x: 1}\nb: {y: 2}", "[1, 2]", "plain"] {
            let doc = parse(text).unwrap();
            let err = Node::build(&doc, &ValuePath::root()).unwrap_err();
            assert!(matches!(err, Error::InvalidNode { .. }), "{text}: {err}");
        }
    }

    #[test]
    fn test_build_missing_path() {
        let doc = parse("a: {b: {c: 1}}").unwrap();
        let err = Node::build(&doc, &ValuePath::root().key("z")).unwrap_err();
        assert!(matches!(err, Error::DanglingPath { .. }));
    }

    #[test]
    fn test_mapping_attributes() {
        let tree = parse_tree("name: case\nsolver: {steps: 10}\ntags: [a, b]\n").unwrap();
        let root = tree.root();

        let names: Vec<&str> = root.attribute_names().collect();
        assert_eq!(names, vec!["name", "solver", "tags"]);
        assert_eq!(root.leaf("name").and_then(Value::as_str), Some("case"));
        assert_eq!(root.leaf("tags").map(Value::len), Some(2));

        let solver = root.child("solver").unwrap();
        assert_eq!(solver.label(), "solver");
        assert_eq!(solver.leaf("steps").and_then(Value::as_i64), Some(10));
        assert!(root.child("name").is_none());
    }

    #[test]
    fn test_single_key_content_wraps_one_child() {
        let tree = parse_tree("wrapper: {inner: {x: 1}}").unwrap();
        let wrapper = tree.root().child("wrapper").unwrap();
        let inner = wrapper.child("inner").unwrap();
        assert_eq!(inner.leaf("x").and_then(Value::as_i64), Some(1));
        assert_eq!(inner.path().to_string(), "$.root.wrapper.inner");
    }

    #[test]
    fn test_sequence_groups_by_label_in_first_seen_order() {
        let tree =
            parse_tree("- b: {id: 1}\n- a: {id: 2}\n- b: {id: 3}\n- plain\n- {x: 1, y: 2}\n")
                .unwrap();
        let root = tree.root();
        let names: Vec<&str> = root.attribute_names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(root.collection("b").map(|c| c.len()), Some(2));
        assert_eq!(root.collection("a").map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_get_on_mapping_returns_raw_values() {
        let tree = parse_tree("solver: {steps: 10}\nname: case\n").unwrap();
        let root = tree.root();
        assert_eq!(root.value("name").and_then(Value::as_str), Some("case"));
        let raw = root.value("solver").unwrap();
        assert_eq!(raw.get_key("steps").and_then(Value::as_i64), Some(10));
        assert!(root.get("missing").is_none());
        assert!(root.get(0).is_none());
    }

    #[test]
    fn test_get_on_sequence() {
        let tree = parse_tree("- item: {id: 1}\n- item: {id: 2}\n- 7\n").unwrap();
        let root = tree.root();

        let items = root.get("item").and_then(Item::into_collection).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(root.value(2).and_then(Value::as_i64), Some(7));
        assert!(root.get(3).is_none());
        assert!(root.get("other").is_none());
    }

    #[test]
    fn test_get_or_empty() {
        let tree = parse_tree("a: {b: {c: 1}}").unwrap();
        let miss = tree.root().get_or_empty("zzz");
        assert_eq!(miss.as_value(), Some(&Value::empty_mapping()));

        let tree = parse_tree("- x: {y: 1}").unwrap();
        let miss = tree.root().get_or_empty(4);
        assert_eq!(miss.as_value(), Some(&Value::empty_sequence()));
        assert!(tree.root().get_or_empty("nope").as_value().unwrap().is_null());
    }

    #[test]
    fn test_index_operator() {
        // plain sequences are not nodes
        let err = parse_tree("- 10\n- 20\n").unwrap_err();
        assert!(matches!(err, Error::InvalidNode { .. }));

        let tree = parse_tree("- item: {id: 1}\n- 20\n").unwrap();
        let root = tree.root();
        assert_eq!(root[1].as_i64(), Some(20));
        assert!(root[0].is_mapping());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_operator_out_of_range() {
        let tree = parse_tree("- item: {id: 1}\n").unwrap();
        let _ = &tree.root()[3];
    }

    #[test]
    fn test_value_or() {
        let tree = parse_tree("a: {b: 1}").unwrap();
        let fallback = Value::from(-1);
        assert_eq!(tree.root().value_or("zzz", &fallback), &fallback);
        assert!(tree.root().value_or("a", &fallback).is_mapping());
    }

    #[test]
    fn test_parent_container() {
        let tree = parse_tree("geometry: {radius: 2}").unwrap();
        let geometry = tree.root().child("geometry").unwrap();
        let parent = geometry.parent_container();
        assert!(parent.get_key("geometry").is_some());
    }

    #[test]
    fn test_serialize_only_own_subtree() {
        let tree = parse_tree("a: {x: 1}\nb: {y: 2}\n").unwrap();
        let a = tree.root().child("a").unwrap();
        let text = a.serialize().unwrap();
        assert_eq!(parse(&text).unwrap(), parse("x: 1").unwrap());
        assert_eq!(a.to_string(), text);
    }

    #[test]
    fn test_find_node_by_path() {
        let tree = parse_tree("list:\n  - item: {id: 1, sub: {deep: {v: 1}}}\n").unwrap();
        let root = tree.root().node();
        let target: ValuePath = "root.list[0].item.sub".parse().unwrap();
        let found = root.find(&target).unwrap();
        assert_eq!(found.label(), "sub");
        assert!(root.find(&"root.nothing".parse().unwrap()).is_none());
    }

    #[test]
    fn test_set_requires_mapping_content() {
        let mut tree = parse_tree("- item: {id: 1}\n").unwrap();
        let err = tree.root_mut().set("k", 1).unwrap_err();
        assert!(matches!(err, Error::NotAMapping { found: "sequence", .. }));
    }

    #[test]
    fn test_into_child_and_member() {
        let mut tree = parse_tree("case:\n  runs:\n    - run: {n: 1}\n    - run: {n: 2}\n").unwrap();
        let mut second = tree
            .root_mut()
            .into_child("case")
            .and_then(|case| case.into_child("runs"))
            .and_then(|runs| runs.into_member("run", 1))
            .unwrap();
        second.set("n", 20).unwrap();

        let runs = tree.root().child("case").unwrap().child("runs").unwrap();
        let values: Vec<i64> = runs
            .collection("run")
            .unwrap()
            .iter()
            .filter_map(|r| r.value("n").and_then(Value::as_i64))
            .collect();
        assert_eq!(values, vec![1, 20]);
    }

    #[test]
    fn test_try_deepset_checks_before_writing() {
        let mut tree = parse_tree("a: {target: 1}").unwrap();
        let err = tree
            .root_mut()
            .try_deepset([("target", 5), ("absent", 6)])
            .unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "absent"));
        assert_eq!(tree.root().deepget("target"), Some(&Value::from(1)));
    }

    #[test]
    fn test_try_deepset_keeps_document_when_a_write_removes_a_later_key() {
        let mut tree = parse_tree("a: {b: 1}\nc: {d: 2}").unwrap();
        let before = tree.document().clone();
        let err = tree
            .root_mut()
            .try_deepset([("a", 5), ("b", 6)])
            .unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "b"));
        assert_eq!(tree.document(), &before);
    }
}
