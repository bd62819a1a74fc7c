//! # yamlnode-document
//!
//! The generic document model behind `yamlnode`.
//!
//! A parsed document is a [`Value`]: an ordered tree of mappings (string keys),
//! sequences and scalars. This crate turns YAML text into that tree, renders the
//! tree back to YAML text, and loads documents from disk. It knows nothing about
//! nodes or deep search; those live in the `yamlnode` crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use yamlnode_document::{parse, serialize};
//!
//! let doc = parse("solver:\n  steps: 200\n").unwrap();
//! let steps = doc.get_key("solver").and_then(|s| s.get_key("steps"));
//! assert_eq!(steps.and_then(|v| v.as_i64()), Some(200));
//!
//! let text = serialize(&doc).unwrap();
//! assert_eq!(parse(&text).unwrap(), doc);
//! ```

mod emitter;
mod error;
mod location;
mod parser;
mod value;

pub use emitter::serialize;
pub use error::{Error, Result};
pub use location::Location;
pub use parser::{load_file, parse, parse_named};
pub use value::{Mapping, Scalar, Sequence, Value};
