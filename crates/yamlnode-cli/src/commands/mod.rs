//! Command implementations for the yamlnode CLI
//!
//! Each command loads the file into a tree, resolves the `--at` node and
//! delegates to the `yamlnode` API.

pub mod edit;
pub mod query;
pub mod show;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use yamlnode::{Item, NodeRef, PathSegment, Tree, Value, ValuePath};

/// The file and node a command operates on
#[derive(Debug, Args)]
pub struct Source {
    /// YAML file to read
    pub file: PathBuf,

    /// Node to operate on, as attribute names (`solver.controls`); `[i]`
    /// picks a member of a collection (`patches.patch[1]`)
    #[arg(long, value_name = "PATH")]
    pub at: Option<String>,
}

impl Source {
    pub fn load(&self) -> Result<Tree> {
        yamlnode::load_tree(&self.file)
            .with_context(|| format!("Failed to load {}", self.file.display()))
    }
}

/// Where modified documents go
#[derive(Debug, Args)]
pub struct WriteOptions {
    /// Rewrite the file instead of printing the result
    #[arg(short = 'i', long)]
    pub in_place: bool,
}

/// Value printing settings
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn print(&self, value: &Value) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", yamlnode_document::serialize(value)?);
        }
        Ok(())
    }

    /// Print the unwrapped document, or write it back to `file`.
    pub fn finish(&self, tree: Tree, file: &Path, write: &WriteOptions) -> Result<()> {
        let document = tree.into_document();
        if !write.in_place {
            return self.print(&document);
        }
        let text = yamlnode_document::serialize(&document)?;
        std::fs::write(file, text)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        tracing::debug!(path = %file.display(), "Wrote document");
        Ok(())
    }
}

/// Walk `at` from the root through child nodes and collection members.
pub fn resolve_at<'t>(tree: &'t Tree, at: Option<&str>) -> Result<NodeRef<'t>> {
    let mut node = tree.root();
    let Some(at) = at else {
        return Ok(node);
    };

    let path: ValuePath = at.parse()?;
    let mut segments = path.segments().iter();
    while let Some(segment) = segments.next() {
        let PathSegment::Key(name) = segment else {
            bail!("Invalid node path '{}': an index must follow a collection name", at);
        };
        node = match node.attribute(name) {
            Some(Item::Node(child)) => child,
            Some(Item::Collection(collection)) => {
                let Some(PathSegment::Index(index)) = segments.next() else {
                    bail!(
                        "'{}' is a collection of {} nodes; pick one with {}[i]",
                        name,
                        collection.len(),
                        name
                    );
                };
                collection
                    .get(*index)
                    .with_context(|| format!("Collection '{}' has no member {}", name, index))?
            }
            Some(Item::Value(_)) => bail!("'{}' is a plain value, not a node", name),
            None => bail!("Node '{}' has no attribute '{}'", node.label(), name),
        };
    }
    Ok(node)
}

/// Parse a command-line value as YAML; an empty string is null.
pub fn parse_value(text: &str) -> Result<Value> {
    yamlnode_document::parse(text).with_context(|| format!("Invalid value: {}", text))
}
