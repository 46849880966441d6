//! # slate-sheets-core
//!
//! Core data structures for the slate-sheets spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout slate-sheets:
//! - [`Position`] and [`Size`] - Cell addressing and the printable bounding box
//! - [`CellValue`] and [`CellError`] - Evaluation results (numbers, strings, errors)
//! - [`IndexedMap`] and [`Grid`] - Sparse storage with ordered iteration
//!
//! ## Example
//!
//! ```rust
//! use slate_sheets_core::{Grid, Position};
//!
//! let mut grid: Grid<String> = Grid::new();
//! grid.set(Position::new(0, 0), "Hello".into());
//! grid.set(Position::new(1, 2), "World".into());
//!
//! let size = grid.printable_size(|_| true);
//! assert_eq!((size.rows, size.cols), (2, 3));
//! ```

pub mod error;
pub mod position;
pub mod storage;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use position::{Position, Size};
pub use storage::{Grid, IndexedMap};
pub use value::{CellError, CellValue};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u16 = 16_384;

/// Leading character that marks the rest of a cell's text as a formula
pub const FORMULA_MARKER: char = '=';

/// Leading character that keeps a cell's text literal; stripped from the
/// displayed value but preserved in the raw text
pub const ESCAPE_MARKER: char = '\'';
