//! Shape predicates deciding how a value is wrapped.
//!
//! Parsing a node turns each child value into one of three things: a stored
//! leaf (plain data), a child node, or a collection of nodes. These functions
//! make that decision. They are total over [`Value`]; nothing here fails.

use crate::Value;

/// True for values that hold no mapping anywhere inside.
///
/// Scalars are plain. Mappings never are. A sequence is plain when every
/// element is.
pub fn is_plain_data(value: &Value) -> bool {
    match value {
        Value::Scalar(_) => true,
        Value::Mapping(_) => false,
        Value::Sequence(items) => items.iter().all(is_plain_data),
    }
}

/// True for a mapping with exactly one key whose value is not plain data.
pub fn is_node(value: &Value) -> bool {
    match value {
        Value::Mapping(entries) if entries.len() == 1 => {
            entries.values().next().is_some_and(|v| !is_plain_data(v))
        }
        _ => false,
    }
}

/// True for a sequence in which every element is a node.
pub fn is_node_collection(value: &Value) -> bool {
    match value {
        Value::Sequence(items) => items.iter().all(is_node),
        _ => false,
    }
}

/// Describe why `value` is not a node, for error messages.
pub(crate) fn describe_non_node(value: &Value) -> String {
    match value {
        Value::Mapping(entries) if entries.len() != 1 => {
            format!("a mapping with {} keys", entries.len())
        }
        Value::Mapping(_) => "a single-key mapping holding plain data".to_string(),
        other => format!("a {}", other.kind()),
    }
}
