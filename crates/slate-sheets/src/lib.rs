//! # slate-sheets
//!
//! An in-memory spreadsheet engine: a sparse two-dimensional grid of cells
//! holding text or formulas, with dependency tracking, cycle rejection at
//! write time, and memoised formula evaluation with graph-driven cache
//! invalidation.
//!
//! ## Example
//!
//! ```rust
//! use slate_sheets::prelude::*;
//!
//! let mut sheet = Sheet::new();
//!
//! sheet.set_cell(Position::parse("A1")?, "2")?;
//! sheet.set_cell(Position::parse("A2")?, "=A1+3")?;
//!
//! let a2 = sheet.cell(Position::parse("A2")?)?.unwrap();
//! assert_eq!(a2.value(), CellValue::Number(5.0));
//! assert_eq!(a2.text(), "=A1+3");
//!
//! // writing upstream invalidates the memoised result
//! sheet.set_cell(Position::parse("A1")?, "4")?;
//! let a2 = sheet.cell(Position::parse("A2")?)?.unwrap();
//! assert_eq!(a2.value(), CellValue::Number(7.0));
//! # Ok::<(), slate_sheets::Error>(())
//! ```

pub mod cell;
pub mod prelude;
pub mod sheet;

pub use cell::Cell;
pub use sheet::{CellRef, Sheet};

// Re-export core types
pub use slate_sheets_core::{
    CellError, CellValue, Error, Grid, IndexedMap, Position, Result, Size, ESCAPE_MARKER,
    FORMULA_MARKER, MAX_COLS, MAX_ROWS,
};

// Re-export the formula capability
pub use slate_sheets_formula::{Formula, FormulaValue, SheetView};
