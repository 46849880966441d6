//! The cell model
//!
//! A cell is a tagged value (empty / text / formula) plus a single-slot
//! cache for formula results. The cache is filled lazily on the first read
//! and dropped by the sheet's invalidation walk; filling it under a `&self`
//! read is the reason for the `RefCell` (the engine is single-threaded by
//! contract).

use std::cell::RefCell;

use slate_sheets_core::{CellValue, Error, Position, Result, ESCAPE_MARKER, FORMULA_MARKER};
use slate_sheets_formula::{Formula, FormulaValue, SheetView};

/// A single sheet cell
#[derive(Debug)]
pub struct Cell {
    kind: CellKind,
    cache: RefCell<Option<FormulaValue>>,
}

/// The three states a cell can hold
#[derive(Debug)]
enum CellKind {
    /// Uninitialised or cleared
    Empty,
    /// Literal text, stored verbatim (escape marker included)
    Text(String),
    /// Parsed formula
    Formula(Formula),
}

impl Cell {
    /// Build a cell from raw text
    ///
    /// - empty text yields an Empty cell;
    /// - text of length ≥ 2 starting with the formula marker is parsed as a
    ///   formula; a parse failure aborts the construction and surfaces as
    ///   [`Error::FormulaParse`];
    /// - anything else (including a lone formula marker) is stored as text.
    pub fn from_text(text: &str) -> Result<Self> {
        let kind = if text.is_empty() {
            CellKind::Empty
        } else if text.len() > 1 && text.starts_with(FORMULA_MARKER) {
            let formula = Formula::parse(&text[FORMULA_MARKER.len_utf8()..])
                .map_err(|e| Error::FormulaParse(e.to_string()))?;
            CellKind::Formula(formula)
        } else {
            CellKind::Text(text.to_string())
        };

        Ok(Self {
            kind,
            cache: RefCell::new(None),
        })
    }

    /// The Empty cell materialised for a referenced position
    pub fn placeholder() -> Self {
        Self {
            kind: CellKind::Empty,
            cache: RefCell::new(None),
        }
    }

    /// Check whether the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, CellKind::Empty)
    }

    /// Check whether the cell holds a formula
    pub fn is_formula(&self) -> bool {
        matches!(self.kind, CellKind::Formula(_))
    }

    /// The value the cell presents to readers
    ///
    /// Empty cells present the empty string; text cells their text with a
    /// leading escape marker stripped; formula cells the cached result,
    /// evaluating through `view` on a cache miss.
    pub fn value(&self, view: &dyn SheetView) -> CellValue {
        match &self.kind {
            CellKind::Empty => CellValue::String(String::new()),
            CellKind::Text(text) => {
                let display = text
                    .strip_prefix(ESCAPE_MARKER)
                    .unwrap_or(text);
                CellValue::String(display.to_string())
            }
            CellKind::Formula(formula) => {
                if let Some(cached) = *self.cache.borrow() {
                    return cached.into();
                }
                let value = formula.evaluate(view);
                *self.cache.borrow_mut() = Some(value);
                value.into()
            }
        }
    }

    /// The raw text of the cell
    ///
    /// Text cells keep any escape marker; formula cells render as the
    /// formula marker plus the canonical expression.
    pub fn text(&self) -> String {
        match &self.kind {
            CellKind::Empty => String::new(),
            CellKind::Text(text) => text.clone(),
            CellKind::Formula(formula) => format!("{}{}", FORMULA_MARKER, formula.expression()),
        }
    }

    /// Positions the cell's formula reads, ascending and deduplicated;
    /// empty for non-formula cells
    pub fn referenced_cells(&self) -> Vec<Position> {
        match &self.kind {
            CellKind::Formula(formula) => formula.referenced_cells(),
            _ => Vec::new(),
        }
    }

    /// Drop any cached formula result; idempotent
    pub fn invalidate_cache(&self) {
        self.cache.take();
    }

    /// Cached formula result, if populated
    pub(crate) fn cached_value(&self) -> Option<FormulaValue> {
        *self.cache.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_sheets_core::CellError;

    struct ZeroView;

    impl SheetView for ZeroView {
        fn read_number(&self, _pos: Position) -> std::result::Result<f64, CellError> {
            Ok(0.0)
        }
    }

    #[test]
    fn test_empty_cell() {
        let cell = Cell::from_text("").unwrap();
        assert!(cell.is_empty());
        assert_eq!(cell.value(&ZeroView), CellValue::String(String::new()));
        assert_eq!(cell.text(), "");
        assert!(cell.referenced_cells().is_empty());
    }

    #[test]
    fn test_text_cell() {
        let cell = Cell::from_text("hello").unwrap();
        assert!(!cell.is_empty());
        assert_eq!(cell.value(&ZeroView), CellValue::from("hello"));
        assert_eq!(cell.text(), "hello");
    }

    #[test]
    fn test_escape_marker_stripped_from_value_only() {
        let cell = Cell::from_text("'=hello").unwrap();
        assert_eq!(cell.value(&ZeroView), CellValue::from("=hello"));
        assert_eq!(cell.text(), "'=hello");

        // a lone escape marker escapes nothing
        let cell = Cell::from_text("'").unwrap();
        assert_eq!(cell.value(&ZeroView), CellValue::String(String::new()));
        assert_eq!(cell.text(), "'");
    }

    #[test]
    fn test_lone_formula_marker_is_text() {
        let cell = Cell::from_text("=").unwrap();
        assert!(!cell.is_formula());
        assert_eq!(cell.value(&ZeroView), CellValue::from("="));
        assert_eq!(cell.text(), "=");
    }

    #[test]
    fn test_formula_cell() {
        let cell = Cell::from_text("=1+2*3").unwrap();
        assert!(cell.is_formula());
        assert_eq!(cell.text(), "=1+2*3");
        assert_eq!(cell.value(&ZeroView), CellValue::Number(7.0));
    }

    #[test]
    fn test_formula_parse_failure() {
        assert!(matches!(
            Cell::from_text("=X"),
            Err(Error::FormulaParse(_))
        ));
        assert!(matches!(
            Cell::from_text("=1+"),
            Err(Error::FormulaParse(_))
        ));
    }

    #[test]
    fn test_formula_references() {
        let cell = Cell::from_text("=B2+A1+B2").unwrap();
        assert_eq!(
            cell.referenced_cells(),
            vec![Position::new(0, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_cache_fills_on_read_and_invalidates() {
        let cell = Cell::from_text("=2*21").unwrap();
        assert_eq!(cell.cached_value(), None);

        assert_eq!(cell.value(&ZeroView), CellValue::Number(42.0));
        assert_eq!(cell.cached_value(), Some(FormulaValue::Number(42.0)));

        cell.invalidate_cache();
        assert_eq!(cell.cached_value(), None);
        // idempotent
        cell.invalidate_cache();
        assert_eq!(cell.cached_value(), None);
    }
}
