//! Locations inside a document.
//!
//! Nodes never hold references into the document they were built from. They
//! hold a [`ValuePath`] instead, and resolve it against the document owned by
//! the [`Tree`](crate::Tree) whenever they are read or written.

use crate::{Error, Value};
use std::fmt;
use std::str::FromStr;

/// One step of a [`ValuePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Entry of a mapping
    Key(String),
    /// Element of a sequence
    Index(usize),
}

/// A chain of mapping keys and sequence indices from a document root.
///
/// Renders as `$.geometry.patches[0].inlet`; the empty path renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    /// The empty path, pointing at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path to the entry `key` of the mapping at this path.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key.into()));
        path
    }

    /// Path to element `index` of the sequence at this path.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Index(index));
        path
    }

    /// Append a path that is relative to this one.
    pub fn join(&self, relative: &ValuePath) -> Self {
        let mut path = self.clone();
        path.segments.extend(relative.segments.iter().cloned());
        path
    }

    pub fn parent(&self) -> Option<ValuePath> {
        let (_, init) = self.segments.split_last()?;
        Some(ValuePath {
            segments: init.to_vec(),
        })
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn starts_with(&self, prefix: &ValuePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Follow this path through `document`.
    ///
    /// Returns `None` when a step does not exist or meets the wrong shape.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Mapping(entries)) => entries.get(key)?,
                (PathSegment::Index(index), Value::Sequence(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable counterpart of [`resolve`](Self::resolve).
    pub fn resolve_mut<'a>(&self, document: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = document;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Mapping(entries)) => entries.get_mut(key)?,
                (PathSegment::Index(index), Value::Sequence(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for ValuePath {
    type Err = Error;

    /// Parse `a.b[0].c`, optionally prefixed with `$`.
    ///
    /// Keys containing `.` or `[` cannot be expressed in this form.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidPath {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let body = text.trim();
        let body = body.strip_prefix('$').unwrap_or(body);
        let body = body.strip_prefix('.').unwrap_or(body);

        let mut path = ValuePath::root();
        if body.is_empty() {
            return Ok(path);
        }

        for token in body.split('.') {
            let (name, mut rest) = match token.find('[') {
                Some(pos) => token.split_at(pos),
                None => (token, ""),
            };
            if name.is_empty() && rest.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !name.is_empty() {
                path.segments.push(PathSegment::Key(name.to_string()));
            }
            while !rest.is_empty() {
                let inner = rest
                    .strip_prefix('[')
                    .ok_or_else(|| invalid("expected '['"))?;
                let close = inner.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let index = inner[..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("index is not a non-negative integer"))?;
                path.segments.push(PathSegment::Index(index));
                rest = &inner[close + 1..];
            }
        }

        Ok(path)
    }
}
