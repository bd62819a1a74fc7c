//! Read-only commands: get, deepget, has, which-has.

use std::process::ExitCode;

use anyhow::{Result, bail};
use yamlnode::{Item, Key, Mapping, NodeRef, Value};

use super::{Output, Source, parse_value, resolve_at};

pub fn get(source: &Source, key: &str, out: &Output) -> Result<ExitCode> {
    let tree = source.load()?;
    let node = resolve_at(&tree, source.at.as_deref())?;

    let Some(item) = node.get(lookup_key(node, key)) else {
        bail!("Key '{}' not found on node '{}'", key, node.label());
    };
    out.print(&item_value(item))?;
    Ok(ExitCode::SUCCESS)
}

pub fn deepget(
    source: &Source,
    key: &str,
    parent: bool,
    default: Option<&str>,
    out: &Output,
) -> Result<ExitCode> {
    let tree = source.load()?;
    let node = resolve_at(&tree, source.at.as_deref())?;

    let found = if parent {
        node.deepget_parent(key)
            .map(|entries| Value::Mapping(entries.clone()))
    } else {
        node.deepget(key).cloned()
    };

    let value = match (found, default) {
        (Some(value), _) => value,
        (None, Some(text)) => parse_value(text)?,
        (None, None) => bail!("Key '{}' not found below node '{}'", key, node.label()),
    };
    out.print(&value)?;
    Ok(ExitCode::SUCCESS)
}

pub fn has(source: &Source, key: &str, deep: bool) -> Result<ExitCode> {
    let tree = source.load()?;
    let node = resolve_at(&tree, source.at.as_deref())?;

    let present = if deep {
        node.deephas(key)
    } else {
        node.has(lookup_key(node, key))
    };
    println!("{}", present);
    Ok(if present {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn which_has(source: &Source, keys: &[String]) -> Result<ExitCode> {
    let tree = source.load()?;
    let node = resolve_at(&tree, source.at.as_deref())?;

    match node.which_has(keys) {
        Some(key) => {
            println!("{}", key);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

/// Numeric keys index sequence nodes; everything else is a name.
fn lookup_key<'k>(node: NodeRef<'_>, key: &'k str) -> Key<'k> {
    match key.parse::<usize>() {
        Ok(index) if node.content().is_sequence() => Key::Index(index),
        _ => Key::Name(key),
    }
}

/// Document data behind a lookup result; collections become a sequence of
/// their members' contents.
fn item_value(item: Item<'_>) -> Value {
    match item {
        Item::Value(value) => value.clone(),
        Item::Node(node) => wrap(node),
        Item::Collection(collection) => Value::Sequence(collection.iter().map(wrap).collect()),
    }
}

fn wrap(node: NodeRef<'_>) -> Value {
    let mut entry = Mapping::new();
    entry.insert(node.label().to_string(), node.content().clone());
    Value::Mapping(entry)
}
