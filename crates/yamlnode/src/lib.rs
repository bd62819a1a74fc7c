//! # yamlnode
//!
//! Attribute-style access and deep key search over parsed YAML configuration.
//!
//! A document is wrapped under a synthetic root key and expanded into
//! [`Node`]s. Every single-key mapping whose value is structured data becomes
//! a node; its entries become attributes. Plain values are stored as leaves,
//! nested single-key mappings become child nodes, and same-labeled nodes in a
//! sequence are grouped into a [`NodeCollection`].
//!
//! ## Design
//!
//! The [`Tree`] owns the document. Nodes hold [`ValuePath`]s into it rather
//! than references, so reading goes through [`NodeRef`] and writing through
//! [`NodeMut`], both borrowed from the tree. Lookups report absence with
//! `None`; there is no sentinel default.
//!
//! ## Example
//!
//! ```rust
//! use yamlnode::parse_tree;
//!
//! let content = r#"
//! solver:
//!   controls: {steps: 200, tolerance: 1.0e-6}
//! boundaries:
//!   - patch: {name: inlet, kind: wall}
//!   - patch: {name: outlet, kind: open}
//! "#;
//!
//! let mut tree = parse_tree(content).unwrap();
//! let root = tree.root();
//! assert_eq!(root.deepget("steps").and_then(|v| v.as_i64()), Some(200));
//!
//! let patches = root.child("boundaries").and_then(|b| b.collection("patch")).unwrap();
//! let outlet = patches.select([("name", "outlet")]).unwrap();
//! assert_eq!(outlet.value("kind").and_then(|v| v.as_str()), Some("open"));
//!
//! tree.root_mut().deepset([("steps", 400)]);
//! assert_eq!(tree.root().deepget("steps").and_then(|v| v.as_i64()), Some(400));
//! ```

mod classify;
mod collection;
mod deep;
mod error;
mod node;
mod path;
mod tree;

pub use classify::{is_node, is_node_collection, is_plain_data};
pub use collection::{CollectionRef, NodeCollection};
pub use deep::{DeepDict, DeepList, DeepMatch, deep_find};
pub use error::{Error, Result};
pub use node::{Attribute, Item, Key, Node, NodeMut, NodeRef};
pub use path::{PathSegment, ValuePath};
pub use tree::{
    DEFAULT_MAX_DEPTH, DEFAULT_ROOT_LABEL, Tree, TreeBuilder, build_tree, load_tree, parse_tree,
};
pub use yamlnode_document::{self as document, Mapping, Scalar, Value};
