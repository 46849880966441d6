//! Prelude module - common imports for slate-sheets users
//!
//! ```rust
//! use slate_sheets::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellError,
    CellRef,
    CellValue,
    // Error types
    Error,
    // Formula capability
    Formula,
    FormulaValue,
    Position,
    Result,
    // Main types
    Sheet,
    SheetView,
    Size,
};
