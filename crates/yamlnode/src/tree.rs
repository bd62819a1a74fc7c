//! Building navigable trees from documents.
//!
//! A [`Tree`] owns the document, wrapped as `{root_label: document}`, together
//! with the [`Node`] built over it. Reads go through [`Tree::root`], writes
//! through [`Tree::root_mut`].
//!
//! # Depth Limiting
//!
//! Node construction is recursive, one level per nested node. Building fails
//! with [`Error::NestingTooDeep`](crate::Error::NestingTooDeep) once the node depth passes
//! [`TreeBuilder::max_depth`] (256 by default).
//!
//! # Example
//!
//! ```rust
//! use yamlnode::parse_tree;
//!
//! let tree = parse_tree("solver:\n  controls: {steps: 200}\n").unwrap();
//! let steps = tree.root().deepget("steps").and_then(|v| v.as_i64());
//! assert_eq!(steps, Some(200));
//! ```

use crate::node::{BuildContext, Node, NodeMut, NodeRef};
use crate::{Mapping, Result, Value, ValuePath};
use std::path::Path;

/// Default limit on node nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default label of the synthetic root entry.
pub const DEFAULT_ROOT_LABEL: &str = "root";

/// Options for tree construction.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    /// Key the document is wrapped under (default: `"root"`).
    pub root_label: String,

    /// Maximum node nesting depth (default: 256).
    pub max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Wrap `document` under the root label and build its nodes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNode`](crate::Error::InvalidNode) when the document is
    /// plain data (a scalar, or a sequence of scalars), and
    /// [`Error::NestingTooDeep`](crate::Error::NestingTooDeep) past the depth
    /// limit.
    pub fn build(&self, document: Value) -> Result<Tree> {
        let mut wrapper = Mapping::new();
        wrapper.insert(self.root_label.clone(), document);
        let document = Value::Mapping(wrapper);

        let root = build_root(&document, self.max_depth)?;
        tracing::debug!(
            root_label = %self.root_label,
            attributes = root.attributes().count(),
            "Built tree"
        );
        Ok(Tree {
            document,
            root,
            max_depth: self.max_depth,
        })
    }

    /// Parse YAML text and build a tree from it.
    pub fn parse(&self, content: &str) -> Result<Tree> {
        self.build(yamlnode_document::parse(content)?)
    }

    /// Load a YAML file and build a tree from it.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Tree> {
        let path = path.as_ref();
        let document = yamlnode_document::load_file(path)?;
        tracing::debug!(path = %path.display(), "Loaded document");
        self.build(document)
    }
}

fn build_root(document: &Value, max_depth: usize) -> Result<Node> {
    let cx = BuildContext {
        document,
        max_depth,
    };
    Node::from_mapping(&cx, ValuePath::root(), 0)
}

/// Build a tree over `document` with default options.
pub fn build_tree(document: Value) -> Result<Tree> {
    TreeBuilder::default().build(document)
}

/// Parse YAML text into a tree with default options.
pub fn parse_tree(content: &str) -> Result<Tree> {
    TreeBuilder::default().parse(content)
}

/// Load a YAML file into a tree with default options.
pub fn load_tree(path: impl AsRef<Path>) -> Result<Tree> {
    TreeBuilder::default().load(path)
}

/// A document and the nodes built over it.
#[derive(Debug, Clone)]
pub struct Tree {
    document: Value,
    root: Node,
    max_depth: usize,
}

impl Tree {
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(&self.document, &self.root)
    }

    pub fn root_mut(&mut self) -> NodeMut<'_> {
        NodeMut::new(&mut self.document, &self.root)
    }

    /// The wrapped document, `{root_label: document}`.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The document as it was before wrapping, including any writes.
    pub fn into_document(self) -> Value {
        match self.document {
            Value::Mapping(mut wrapper) => wrapper
                .swap_remove(self.root.label())
                .unwrap_or_default(),
            other => other,
        }
    }

    /// Rebuild all nodes from the current document.
    ///
    /// Writes change the document but not the parsed attributes. After a
    /// write that adds or removes structure, reparse so the new shape can be
    /// navigated.
    pub fn reparse(&mut self) -> Result<()> {
        self.root = build_root(&self.document, self.max_depth)?;
        tracing::debug!(root_label = %self.root.label(), "Rebuilt tree");
        Ok(())
    }

    /// The node whose content is at `path` in [`document`](Self::document).
    pub fn node_at(&self, path: &ValuePath) -> Option<NodeRef<'_>> {
        let node = self.root.find(path)?;
        Some(NodeRef::new(&self.document, node))
    }

    pub fn node_at_mut(&mut self, path: &ValuePath) -> Option<NodeMut<'_>> {
        let node = self.root.find(path)?;
        Some(NodeMut::new(&mut self.document, node))
    }
}

impl Default for Tree {
    /// The tree over `{"null": {}}`.
    fn default() -> Self {
        let root = Node::empty("null");
        let mut wrapper = Mapping::new();
        wrapper.insert(root.label().to_string(), Value::empty_mapping());
        Self {
            document: Value::Mapping(wrapper),
            root,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_wraps_under_root_label() {
        let tree = parse_tree("a: {b: 1}").unwrap();
        assert_eq!(tree.root().label(), "root");
        assert!(tree.document().get_key("root").is_some());
        assert_eq!(tree.root().path().to_string(), "$.root");
    }

    #[test]
    fn test_custom_root_label() {
        let tree = TreeBuilder::new()
            .root_label("config")
            .parse("a: {b: 1}")
            .unwrap();
        assert_eq!(tree.root().label(), "config");
    }

    #[test]
    fn test_plain_documents_are_not_nodes() {
        for text in ["42", "[1, 2, 3]", ""] {
            let err = parse_tree(text).unwrap_err();
            assert!(matches!(err, Error::InvalidNode { .. }), "{text}: {err}");
        }
    }

    #[test]
    fn test_parse_errors_propagate() {
        let err = parse_tree("a: [1, 2").unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }

    #[test]
    fn test_depth_limit() {
        let text = "a: {b: {c: {d: {e: 1}}}}";
        let err = TreeBuilder::new().max_depth(2).parse(text).unwrap_err();
        match err {
            Error::NestingTooDeep { max_depth, path } => {
                assert_eq!(max_depth, 2);
                assert_eq!(path.to_string(), "$.root.a.b.c");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(TreeBuilder::new().max_depth(8).parse(text).is_ok());
    }

    #[test]
    fn test_default_tree() {
        let tree = Tree::default();
        assert_eq!(tree.root().label(), "null");
        assert_eq!(tree.root().content(), &Value::empty_mapping());
        assert_eq!(tree.root().attribute_names().count(), 0);
    }

    #[test]
    fn test_into_document_unwraps() {
        let mut tree = parse_tree("a: {b: 1}").unwrap();
        tree.root_mut().deepset([("b", 2)]);
        let doc = tree.into_document();
        assert_eq!(doc, yamlnode_document::parse("a: {b: 2}").unwrap());
    }

    #[test]
    fn test_reparse_picks_up_new_structure() {
        let mut tree = parse_tree("a: {b: 1}\nc: 2").unwrap();
        let added: Value = [("x", 1)].into_iter().collect();
        tree.root_mut().set("extra", added).unwrap();
        assert!(tree.root().child("extra").is_none());

        tree.reparse().unwrap();
        let extra = tree.root().child("extra").unwrap();
        assert_eq!(extra.leaf("x").and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn test_node_at() {
        let mut tree = parse_tree("outer: {inner: {x: 1}, y: 2}").unwrap();
        let path = tree
            .root()
            .child("outer")
            .and_then(|o| o.child("inner"))
            .map(|n| n.path().clone())
            .unwrap();

        tree.node_at_mut(&path).unwrap().set("x", 10).unwrap();
        let inner = tree.node_at(&path).unwrap();
        assert_eq!(inner.value("x").and_then(Value::as_i64), Some(10));
        assert!(tree.node_at(&"root.outer.y".parse().unwrap()).is_none());
    }

    #[test]
    fn test_load_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.yaml");
        std::fs::write(&path, "solver: {steps: 3}\n").unwrap();
        let tree = load_tree(&path).unwrap();
        assert_eq!(tree.root().deepget("steps").and_then(Value::as_i64), Some(3));

        let err = load_tree(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::Document(yamlnode_document::Error::Io { .. })));
    }
}
