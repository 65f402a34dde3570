//! # Source Locations
//!
//! Where a shape or literal value was defined. Locations are carried through
//! to every diagnostic so reporting layers can point at the offending text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// File, line and column of a definition. Line and column are 1-based; a
/// location with an empty filename and zero line means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file name, or empty when unknown.
    pub filename: String,
    /// 1-based line, or 0 when unknown.
    pub line: u32,
    /// 1-based column, or 0 when unknown.
    pub column: u32,
}

impl SourceLocation {
    /// Construct a location in `filename`.
    pub fn new(filename: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }

    /// The unknown location.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if this is the unknown location.
    pub fn is_none(&self) -> bool {
        self.filename.is_empty() && self.line == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "N/A")
        } else {
            write!(f, "{} [{}, {}]", self.filename, self.line, self.column)
        }
    }
}
