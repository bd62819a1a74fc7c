//! Groups of sibling nodes sharing one label.

use crate::node::{Node, NodeRef};
use crate::Value;
use std::fmt;

/// An ordered group of nodes with the same label.
///
/// Built when a sequence holds single-key mappings that qualify as nodes;
/// nodes keep the order they have in the sequence.
#[derive(Debug, Clone)]
pub struct NodeCollection {
    label: String,
    nodes: Vec<Node>,
}

impl NodeCollection {
    /// Wrap `nodes` in a collection.
    ///
    /// A single node is still returned as a collection of one; callers that
    /// index a group always get the same shape back.
    pub fn create(label: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            label: label.into(),
            nodes,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// Read view of a [`NodeCollection`] (or of a selection from one).
#[derive(Clone)]
pub struct CollectionRef<'a> {
    document: &'a Value,
    label: &'a str,
    nodes: Vec<&'a Node>,
}

impl<'a> CollectionRef<'a> {
    pub(crate) fn new(document: &'a Value, collection: &'a NodeCollection) -> Self {
        Self {
            document,
            label: &collection.label,
            nodes: collection.nodes.iter().collect(),
        }
    }

    pub fn label(&self) -> &'a str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        self.nodes
            .get(index)
            .map(|node| NodeRef::new(self.document, node))
    }

    pub fn first(&self) -> Option<NodeRef<'a>> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        let document = self.document;
        self.nodes.iter().map(move |node| NodeRef::new(document, node))
    }

    /// First node whose fields equal every given value.
    ///
    /// A field is compared through [`NodeRef::value`], so only plain values
    /// stored directly on the node can match.
    ///
    /// ```rust
    /// use yamlnode::parse_tree;
    ///
    /// let tree = parse_tree("- item: {id: 1}\n- item: {id: 2}\n").unwrap();
    /// let items = tree.root().collection("item").unwrap();
    /// let second = items.select([("id", 2)]).unwrap();
    /// assert_eq!(second.value("id").and_then(|v| v.as_i64()), Some(2));
    /// ```
    pub fn select<K, V>(&self, criteria: impl IntoIterator<Item = (K, V)>) -> Option<NodeRef<'a>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.matching(criteria)
            .into_iter()
            .next()
            .map(|node| NodeRef::new(self.document, node))
    }

    /// All nodes matching the criteria, as a new collection.
    ///
    /// Returns `None` rather than an empty collection when nothing matches.
    pub fn select_all<K, V>(
        &self,
        criteria: impl IntoIterator<Item = (K, V)>,
    ) -> Option<CollectionRef<'a>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let nodes = self.matching(criteria);
        if nodes.is_empty() {
            return None;
        }
        Some(CollectionRef {
            document: self.document,
            label: self.label,
            nodes,
        })
    }

    fn matching<K, V>(&self, criteria: impl IntoIterator<Item = (K, V)>) -> Vec<&'a Node>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut matches = self.nodes.clone();
        for (field, expected) in criteria {
            let expected = expected.into();
            matches.retain(|node| {
                NodeRef::new(self.document, node)
                    .value(field.as_ref())
                    .is_some_and(|found| same_value(found, &expected))
            });
        }
        matches
    }
}

/// Equality for selection criteria; integers and floats compare by number.
fn same_value(found: &Value, expected: &Value) -> bool {
    match (found.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) if found.as_i64().is_none() || expected.as_i64().is_none() => a == b,
        _ => found == expected,
    }
}

impl fmt::Debug for CollectionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
