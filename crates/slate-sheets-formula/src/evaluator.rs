//! Formula evaluation
//!
//! Evaluation is pull-based: the engine hands the formula a [`SheetView`]
//! and each cell reference is resolved through it. Formula errors travel
//! as values, never as panics or `Err` at the crate boundary.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use slate_sheets_core::{CellError, CellValue, Position};

/// Read-only view of a sheet during evaluation
///
/// The engine implements this; a formula holds no reference back to the
/// sheet and receives a view per evaluation.
pub trait SheetView {
    /// Resolve a referenced position to a numeric operand, or the error
    /// the referenced cell carries
    fn read_number(&self, pos: Position) -> Result<f64, CellError>;
}

/// The result of executing a formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormulaValue {
    /// Numeric result
    Number(f64),
    /// Error result
    Error(CellError),
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::Error(e) => CellValue::Error(e),
        }
    }
}

/// The numeric grammar for text cells: a complete, finite float literal
///
/// Anything else (including `inf`/`NaN` spellings and trailing garbage)
/// is not a number.
pub fn numeric_text(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Evaluate an expression against a sheet view
pub(crate) fn evaluate_expr(expr: &Expr, view: &dyn SheetView) -> Result<f64, CellError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Reference(pos) => view.read_number(*pos),
        Expr::UnaryOp { op, operand } => {
            let value = evaluate_expr(operand, view)?;
            match op {
                UnaryOperator::Negate => Ok(-value),
            }
        }
        Expr::BinaryOp { op, left, right } => {
            let lhs = evaluate_expr(left, view)?;
            let rhs = evaluate_expr(right, view)?;
            match op {
                BinaryOperator::Add => Ok(lhs + rhs),
                BinaryOperator::Subtract => Ok(lhs - rhs),
                BinaryOperator::Multiply => Ok(lhs * rhs),
                BinaryOperator::Divide => {
                    if rhs == 0.0 {
                        Err(CellError::Div0)
                    } else {
                        Ok(lhs / rhs)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use std::collections::HashMap;

    /// Stub view backed by a position → operand map
    struct MapView(HashMap<Position, Result<f64, CellError>>);

    impl MapView {
        fn new(entries: &[(&str, Result<f64, CellError>)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(s, v)| (Position::parse(s).unwrap(), *v))
                    .collect(),
            )
        }
    }

    impl SheetView for MapView {
        fn read_number(&self, pos: Position) -> Result<f64, CellError> {
            self.0.get(&pos).copied().unwrap_or(Ok(0.0))
        }
    }

    fn eval(text: &str, view: &dyn SheetView) -> Result<f64, CellError> {
        evaluate_expr(&parse_expression(text).unwrap(), view)
    }

    #[test]
    fn test_arithmetic() {
        let view = MapView::new(&[]);
        assert_eq!(eval("1+2*3", &view), Ok(7.0));
        assert_eq!(eval("(1+2)*3", &view), Ok(9.0));
        assert_eq!(eval("10/4", &view), Ok(2.5));
        assert_eq!(eval("-3-4", &view), Ok(-7.0));
    }

    #[test]
    fn test_references() {
        let view = MapView::new(&[("A1", Ok(2.0)), ("B1", Ok(5.0))]);
        assert_eq!(eval("A1+3", &view), Ok(5.0));
        assert_eq!(eval("A1*B1", &view), Ok(10.0));
        // unset cells read as zero
        assert_eq!(eval("C9+1", &view), Ok(1.0));
    }

    #[test]
    fn test_division_by_zero() {
        let view = MapView::new(&[("A1", Ok(0.0))]);
        assert_eq!(eval("1/0", &view), Err(CellError::Div0));
        assert_eq!(eval("1/A1", &view), Err(CellError::Div0));
        assert_eq!(eval("0/1", &view), Ok(0.0));
    }

    #[test]
    fn test_error_propagation() {
        let view = MapView::new(&[("A1", Err(CellError::Value)), ("B1", Ok(1.0))]);
        assert_eq!(eval("A1+B1", &view), Err(CellError::Value));
        assert_eq!(eval("-A1", &view), Err(CellError::Value));
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(numeric_text("12"), Some(12.0));
        assert_eq!(numeric_text("-3.5"), Some(-3.5));
        assert_eq!(numeric_text("1e3"), Some(1000.0));
        assert_eq!(numeric_text(""), None);
        assert_eq!(numeric_text("12x"), None);
        assert_eq!(numeric_text(" 12"), None);
        assert_eq!(numeric_text("inf"), None);
        assert_eq!(numeric_text("NaN"), None);
    }
}
