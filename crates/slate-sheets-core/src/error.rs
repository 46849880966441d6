//! Error types for slate-sheets-core

use crate::position::Position;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the sheet engine
#[derive(Debug, Error)]
pub enum Error {
    /// Position outside the valid grid
    #[error("Invalid position: ({}, {})", .0.row, .0.col)]
    InvalidPosition(Position),

    /// Invalid position text (e.g., "A0", "1A")
    #[error("Invalid position text: {0}")]
    InvalidPositionText(String),

    /// Formula text that does not parse; the offending cell is left untouched
    #[error("Formula parse error: {0}")]
    FormulaParse(String),

    /// A write that would close a reference cycle
    #[error("Circular dependency from {from} to {to}")]
    CircularDependency {
        /// Cell being written
        from: Position,
        /// Referenced cell that closes the cycle
        to: Position,
    },
}
