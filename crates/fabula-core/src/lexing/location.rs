// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Fabula is a line-oriented language, so positions are 1-based
//! line/column pairs rather than byte offsets. Every lexical node and
//! diagnostic carries a `Location`.

use std::fmt;

/// A position in a source document, as a 1-based line/column pair.
///
/// Locations order line-major, so sorting diagnostics by location yields
/// document order.
///
/// # Examples
///
/// ```
/// use fabula_core::lexing::Location;
///
/// let loc = Location::new(3, 7);
/// assert_eq!(loc.line(), 3);
/// assert_eq!(loc.column(), 7);
/// assert!(loc < Location::new(4, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    line: u32,
    column: u32,
}

impl Location {
    /// Creates a new location from 1-based line and column numbers.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Creates a location at the first column of the given line.
    #[must_use]
    pub const fn line_start(line: u32) -> Self {
        Self { line, column: 1 }
    }

    /// Returns the 1-based line number.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns the 1-based column number.
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }

    /// Returns the same line with a different column.
    #[must_use]
    pub const fn with_column(self, column: u32) -> Self {
        Self {
            line: self.line,
            column,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

impl From<(u32, u32)> for Location {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}
