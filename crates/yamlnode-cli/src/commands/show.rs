//! Display commands: dump, tree.

use std::fmt::Write;
use std::process::ExitCode;

use anyhow::Result;
use yamlnode::{Item, NodeRef, Value};

use super::{Output, Source, resolve_at};

pub fn dump(source: &Source, out: &Output) -> Result<ExitCode> {
    let tree = source.load()?;
    let node = resolve_at(&tree, source.at.as_deref())?;
    out.print(node.content())?;
    Ok(ExitCode::SUCCESS)
}

/// Print one line per attribute, children indented under their parent.
pub fn tree(source: &Source) -> Result<ExitCode> {
    let tree = source.load()?;
    let node = resolve_at(&tree, source.at.as_deref())?;

    let mut text = String::new();
    writeln!(text, "{}", node.label())?;
    outline(node, 1, &mut text)?;
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}

fn outline(node: NodeRef<'_>, depth: usize, text: &mut String) -> Result<()> {
    let indent = "  ".repeat(depth);
    for (name, item) in node.attributes() {
        match item {
            Item::Value(value) => writeln!(text, "{}{} = {}", indent, name, inline(value)?)?,
            Item::Node(child) => {
                writeln!(text, "{}{}", indent, name)?;
                outline(child, depth + 1, text)?;
            }
            Item::Collection(collection) => {
                for (index, member) in collection.iter().enumerate() {
                    writeln!(text, "{}{}[{}]", indent, name, index)?;
                    outline(member, depth + 1, text)?;
                }
            }
        }
    }
    Ok(())
}

fn inline(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Scalar(scalar) => scalar.to_string(),
        other => serde_json::to_string(other)?,
    })
}
