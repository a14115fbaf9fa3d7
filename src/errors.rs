//! Error types for building puzzles and loading their inputs.
//!
//! The solver itself never fails: running out of options is reported as a normal outcome. These
//! errors cover malformed grid geometry and unreadable input files.
//!
//! # Error Codes
//!
//! - G001: `EmptyTemplate`
//! - G002: `InvalidTemplateChar`
//! - G003: `RaggedTemplate`
//! - G004: `ZeroLengthEntry`
//! - G005: `ParallelOverlap`
//! - G006: `MultipleCrossings`
//! - L001: `Io`
//! - L002: `Grid` (wraps a `GridConfigError`)

use std::io;
use std::path::PathBuf;

use crate::GridCoord;

/// Problems with the geometry of a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridConfigError {
    #[error("Grid template has no rows")]
    EmptyTemplate,

    #[error("Invalid character '{ch}' in grid template at ({x}, {y})")]
    InvalidTemplateChar { ch: char, x: usize, y: usize },

    #[error("Row {row} of grid template has {found} cells, expected {expected}")]
    RaggedTemplate { row: usize, expected: usize, found: usize },

    #[error("Entry {index} has zero length")]
    ZeroLengthEntry { index: usize },

    #[error("Entries {first} and {second} run in the same direction through a shared cell")]
    ParallelOverlap { first: usize, second: usize },

    #[error("More than two entries cross in cell {cell:?}")]
    MultipleCrossings { cell: GridCoord },
}

impl GridConfigError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GridConfigError::EmptyTemplate => "G001",
            GridConfigError::InvalidTemplateChar { .. } => "G002",
            GridConfigError::RaggedTemplate { .. } => "G003",
            GridConfigError::ZeroLengthEntry { .. } => "G004",
            GridConfigError::ParallelOverlap { .. } => "G005",
            GridConfigError::MultipleCrossings { .. } => "G006",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            GridConfigError::EmptyTemplate => Some("Give at least one row of cells"),
            GridConfigError::InvalidTemplateChar { .. } => {
                Some("Use '#' for blocked cells and '_' or '.' for open cells")
            }
            GridConfigError::RaggedTemplate { .. } => Some("Every row must have the same width"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self.help() {
            Some(help) => format!("{self} ({})\n  help: {help}", self.code()),
            None => format!("{self} ({})", self.code()),
        }
    }
}

/// Problems reading a puzzle's inputs or writing its output.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid grid: {0}")]
    Grid(#[from] GridConfigError),
}

impl LoadError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "L001",
            LoadError::Grid(_) => "L002",
        }
    }

    /// Formats the error with code, delegating to the wrapped grid error if there is one
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            LoadError::Grid(grid_error) => {
                format!("{}\n  caused by: {}", self.code(), grid_error.display_detailed())
            }
            LoadError::Io { .. } => format!("{self} ({})", self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{GridConfigError, LoadError};

    #[test]
    fn test_grid_errors_have_codes_and_help() {
        let error = GridConfigError::InvalidTemplateChar { ch: '?', x: 2, y: 1 };

        assert_eq!(error.code(), "G002");
        assert_eq!(error.to_string(), "Invalid character '?' in grid template at (2, 1)");
        assert!(error.display_detailed().contains("help:"));
        assert_eq!(GridConfigError::MultipleCrossings { cell: (0, 0) }.help(), None);
    }

    #[test]
    fn test_load_error_wraps_grid_error() {
        let error: LoadError = GridConfigError::EmptyTemplate.into();

        assert_eq!(error.code(), "L002");
        assert!(error.display_detailed().contains("G001"));
    }
}
