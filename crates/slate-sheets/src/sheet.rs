//! The sheet engine
//!
//! Owns the cell grid and the reverse dependency graph, and runs the
//! mutation protocol: writes and clears compute an edge delta, reject
//! cycles before touching anything, materialise placeholder cells for
//! fresh references, and walk dependents to drop stale caches.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use slate_sheets_core::{CellError, CellValue, Error, Grid, Position, Result, Size};
use slate_sheets_formula::{numeric_text, SheetView};

use crate::cell::Cell;

/// An in-memory spreadsheet
///
/// # Example
///
/// ```rust
/// use slate_sheets::{Position, Sheet};
///
/// let mut sheet = Sheet::new();
/// sheet.set_cell(Position::new(0, 0), "2").unwrap();
/// sheet.set_cell(Position::new(1, 0), "=A1+3").unwrap();
///
/// let cell = sheet.cell(Position::new(1, 0)).unwrap().unwrap();
/// assert_eq!(cell.value().as_number(), Some(5.0));
/// ```
#[derive(Debug, Default)]
pub struct Sheet {
    /// Cell storage; holds placeholder Empty cells for referenced positions
    cells: Grid<Cell>,
    /// Reverse dependency graph: referenced position → cells whose
    /// formulas read it. An entry exists iff its set is non-empty.
    referrers: HashMap<Position, HashSet<Position>>,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Write raw text to a position
    ///
    /// An empty string clears the cell. Text starting with the formula
    /// marker (and longer than the marker itself) is parsed as a formula.
    /// Fails with [`Error::InvalidPosition`], [`Error::FormulaParse`] or
    /// [`Error::CircularDependency`]; on failure nothing changes.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            return Err(Error::InvalidPosition(pos));
        }
        if text.is_empty() {
            return self.clear_cell(pos);
        }

        let cell = Cell::from_text(text)?;

        let old_refs: HashSet<Position> = self
            .cells
            .get(pos)
            .map(|c| c.referenced_cells().into_iter().collect())
            .unwrap_or_default();
        let new_refs: HashSet<Position> = cell.referenced_cells().into_iter().collect();

        let to_add: HashSet<Position> = new_refs.difference(&old_refs).copied().collect();
        let to_remove: HashSet<Position> = old_refs.difference(&new_refs).copied().collect();

        if let Some(target) = self.find_cycle(pos, &to_add, &to_remove) {
            return Err(Error::CircularDependency {
                from: pos,
                to: target,
            });
        }

        // Referenced positions must resolve to a cell for readers
        for &q in &new_refs {
            if self.cells.get(q).is_none() {
                self.cells.set(q, Cell::placeholder());
            }
        }

        for &q in &to_add {
            self.referrers.entry(q).or_default().insert(pos);
        }
        for &q in &to_remove {
            self.remove_edge(pos, q);
        }

        self.cells.set(pos, cell);
        self.invalidate_dependents(pos);
        Ok(())
    }

    /// Clear the cell at a position; a no-op when nothing is there
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        if !pos.is_valid() {
            return Err(Error::InvalidPosition(pos));
        }
        let Some(cell) = self.cells.get(pos) else {
            return Ok(());
        };

        for q in cell.referenced_cells() {
            self.remove_edge(pos, q);
        }
        self.cells.remove(pos);
        self.invalidate_dependents(pos);
        Ok(())
    }

    /// Read-only handle to the cell at a position, if one is materialised
    pub fn cell(&self, pos: Position) -> Result<Option<CellRef<'_>>> {
        if !pos.is_valid() {
            return Err(Error::InvalidPosition(pos));
        }
        Ok(self
            .cells
            .get(pos)
            .map(|cell| CellRef { sheet: self, cell }))
    }

    /// The printable bounding box over non-empty cells
    ///
    /// Placeholder Empty cells do not widen the box.
    pub fn printable_size(&self) -> Size {
        self.cells.printable_size(|cell| !cell.is_empty())
    }

    /// Render cell values over the printable area
    ///
    /// Tab between cells, newline after every row, empty fields for absent
    /// and empty cells.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |cell| cell.value(self).to_string())
    }

    /// Render raw cell texts over the printable area
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |cell| cell.text())
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Cell) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                if let Some(cell) = self.cells.get(Position::new(row, col)) {
                    write!(out, "{}", render(cell))?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Drop the edge `src → dst`, removing the graph entry if it empties
    fn remove_edge(&mut self, src: Position, dst: Position) {
        if let Some(set) = self.referrers.get_mut(&dst) {
            set.remove(&src);
            if set.is_empty() {
                self.referrers.remove(&dst);
            }
        }
    }

    /// Check whether adding the edges `pos → to_add` (with `pos → to_remove`
    /// gone) would close a cycle; returns the offending reference
    ///
    /// Every position reachable from `pos` over referrer edges transitively
    /// reads `pos`, so reaching a member of `to_add` closes a cycle. A
    /// self-reference is a cycle outright.
    fn find_cycle(
        &self,
        pos: Position,
        to_add: &HashSet<Position>,
        to_remove: &HashSet<Position>,
    ) -> Option<Position> {
        if to_add.is_empty() {
            return None;
        }
        if to_add.contains(&pos) {
            return Some(pos);
        }

        let mut discovered = HashSet::new();
        let mut stack = vec![pos];
        while let Some(v) = stack.pop() {
            if !discovered.insert(v) {
                continue;
            }
            if v != pos && to_add.contains(&v) {
                return Some(v);
            }
            if let Some(referrers) = self.referrers.get(&v) {
                for &r in referrers {
                    // edge r → v is scheduled for removal in this write
                    if r == pos && to_remove.contains(&v) {
                        continue;
                    }
                    stack.push(r);
                }
            }
        }
        None
    }

    /// Drop the cached result of every cell that transitively reads `pos`,
    /// including `pos` itself
    ///
    /// Explicit-stack DFS over referrer edges; the graph is acyclic, so a
    /// discovered set is enough for termination.
    fn invalidate_dependents(&self, pos: Position) {
        let mut discovered = HashSet::new();
        let mut stack = vec![pos];
        while let Some(v) = stack.pop() {
            if !discovered.insert(v) {
                continue;
            }
            if let Some(cell) = self.cells.get(v) {
                cell.invalidate_cache();
            }
            if let Some(referrers) = self.referrers.get(&v) {
                stack.extend(referrers.iter().copied());
            }
        }
    }

    /// Referrer set for a position; empty when absent
    #[cfg(test)]
    fn referrers_of(&self, pos: Position) -> HashSet<Position> {
        self.referrers.get(&pos).cloned().unwrap_or_default()
    }
}

impl SheetView for Sheet {
    /// Resolve a referenced position per the evaluation contract: invalid
    /// positions are a ref error, missing and empty cells read as zero,
    /// text must spell a number, formulas evaluate recursively (memoised).
    fn read_number(&self, pos: Position) -> std::result::Result<f64, CellError> {
        if !pos.is_valid() {
            return Err(CellError::Ref);
        }
        let Some(cell) = self.cells.get(pos) else {
            return Ok(0.0);
        };
        match cell.value(self) {
            CellValue::Number(n) => Ok(n),
            CellValue::Error(e) => Err(e),
            CellValue::String(s) => {
                if s.is_empty() {
                    Ok(0.0)
                } else {
                    numeric_text(&s).ok_or(CellError::Value)
                }
            }
        }
    }
}

/// Read-only handle to a materialised cell
///
/// Carries the owning sheet so that [`CellRef::value`] can evaluate
/// formulas without the cell holding any reference back to the sheet.
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    sheet: &'a Sheet,
    cell: &'a Cell,
}

impl CellRef<'_> {
    /// The cell's value; formula results are memoised
    pub fn value(&self) -> CellValue {
        self.cell.value(self.sheet)
    }

    /// The cell's raw text
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Positions the cell's formula reads
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell.referenced_cells()
    }

    /// Check whether the cell is empty (e.g., a placeholder)
    pub fn is_empty(&self) -> bool {
        self.cell.is_empty()
    }
}
