//! Source locations for document errors.

use serde::Serialize;
use std::fmt;

/// Position of an element in the original YAML text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Optional filename or source identifier
    pub file: Option<String>,

    /// Byte offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub col: usize,
}

impl Location {
    pub fn new(file: Option<String>, offset: usize, line: usize, col: usize) -> Self {
        Self {
            file,
            offset,
            line,
            col,
        }
    }

    /// Create a Location from a yaml-rust2 marker.
    ///
    /// yaml-rust2 counts lines from 1 and columns from 0.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker) -> Self {
        Self {
            file: None,
            offset: marker.index(),
            line: marker.line(),
            col: marker.col() + 1,
        }
    }

    /// Set the filename for this location.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "line {}, column {}", self.line, self.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_file() {
        let loc = Location::new(None, 12, 3, 5);
        assert_eq!(loc.to_string(), "line 3, column 5");
    }

    #[test]
    fn test_display_with_file() {
        let loc = Location::new(None, 0, 2, 1).with_file("case.yaml");
        assert_eq!(loc.to_string(), "case.yaml:2:1");
    }

    #[test]
    fn test_default() {
        let loc = Location::default();
        assert_eq!(loc.file, None);
        assert_eq!(loc.offset, 0);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.col, 1);
    }
}
