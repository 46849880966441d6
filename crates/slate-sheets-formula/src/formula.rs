//! The parsed-formula handle consumed by the sheet engine

use crate::ast::Expr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate_expr, FormulaValue, SheetView};
use crate::parser::parse_expression;
use slate_sheets_core::Position;

/// A parsed formula
///
/// Owns its AST and nothing else; evaluation receives a [`SheetView`]
/// per call.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse an expression (the text after the formula marker)
    pub fn parse(expression: &str) -> FormulaResult<Self> {
        Ok(Self {
            expr: parse_expression(expression)?,
        })
    }

    /// Execute the formula against a sheet view
    ///
    /// Arithmetic errors come back as [`FormulaValue::Error`], never as a
    /// failure.
    pub fn evaluate(&self, view: &dyn SheetView) -> FormulaValue {
        match evaluate_expr(&self.expr, view) {
            Ok(n) => FormulaValue::Number(n),
            Err(e) => FormulaValue::Error(e),
        }
    }

    /// Canonical stringification of the expression
    ///
    /// Re-parsing the result yields the same formula.
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// Positions the formula reads, ascending and deduplicated
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut refs = Vec::new();
        self.expr.collect_references(&mut refs);
        refs.sort_unstable();
        refs.dedup();
        refs
    }
}
