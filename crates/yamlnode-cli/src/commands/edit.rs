//! Commands that modify the document: set, deepset.

use std::process::ExitCode;

use anyhow::{Context, Result};
use yamlnode::{NodeMut, Tree, Value};

use super::{Output, Source, WriteOptions, parse_value, resolve_at};

pub fn set(
    source: &Source,
    key: &str,
    value: &str,
    write: &WriteOptions,
    out: &Output,
) -> Result<ExitCode> {
    let value = parse_value(value)?;
    let mut tree = source.load()?;

    target(&mut tree, source)?.set(key, value)?;
    out.finish(tree, &source.file, write)?;
    Ok(ExitCode::SUCCESS)
}

pub fn deepset(
    source: &Source,
    pairs: &[String],
    strict: bool,
    write: &WriteOptions,
    out: &Output,
) -> Result<ExitCode> {
    let pairs = pairs
        .iter()
        .map(|pair| parse_pair(pair))
        .collect::<Result<Vec<_>>>()?;
    let mut tree = source.load()?;

    let mut node = target(&mut tree, source)?;
    let written = if strict {
        node.try_deepset(pairs)?
    } else {
        node.deepset(pairs)
    };
    tracing::info!(written, "Deep assignment finished");

    out.finish(tree, &source.file, write)?;
    Ok(ExitCode::SUCCESS)
}

fn target<'t>(tree: &'t mut Tree, source: &Source) -> Result<NodeMut<'t>> {
    let path = resolve_at(tree, source.at.as_deref())?.path().clone();
    tree.node_at_mut(&path)
        .with_context(|| format!("No node at {}", path))
}

fn parse_pair(pair: &str) -> Result<(&str, Value)> {
    let (key, value) = pair
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got '{}'", pair))?;
    Ok((key, parse_value(value)?))
}
