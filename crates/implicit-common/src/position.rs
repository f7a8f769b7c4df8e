//! Line/column locations of derivation sites.

use serde::{Deserialize, Serialize};

/// A 1-based line/column location in a source file.
///
/// Rendered as `file:line:column`, the form used by derivation diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Build a location from 0-based line/character offsets, as host
    /// checkers usually report them.
    pub fn from_zero_based(file: impl Into<String>, line: u32, character: u32) -> Self {
        Self::new(file, line + 1, character + 1)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(SourceLocation::new("a.ts", 2, 5).to_string(), "a.ts:2:5");
        assert_eq!(
            SourceLocation::from_zero_based("a.ts", 0, 0).to_string(),
            "a.ts:1:1"
        );
    }
}
