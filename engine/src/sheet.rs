//! FILENAME: engine/src/sheet.rs
//! PURPOSE: Sparse 2-D cell store; orchestrates the probe/commit/invalidate
//! edit protocol and the recursive, memoizing value lookup.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::cell::Cell;
use crate::dependency_graph::DependencyGraph;
use crate::error::{CircularDependencyException, SheetError};
use crate::position::{Position, Size};
use crate::value::CellValue;

/// A sparse, in-memory spreadsheet.
#[derive(Default)]
pub struct Sheet {
    cells: HashMap<Position, Cell>,
    graph: DependencyGraph,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet::default()
    }

    /// Sets `pos`'s content from raw text, running the full edit protocol:
    /// probe (parse + auto-materialize references) -> cycle check -> commit
    /// -> invalidate. Auto-materialized Empty cells persist even if the
    /// cycle check subsequently rejects the edit.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }

        log::trace!("probing set_cell at {}", pos);
        let candidate = Cell::from_text(text)?;
        let new_precedents = candidate.referenced_cells();

        for &p in &new_precedents {
            self.cells.entry(p).or_insert_with(Cell::clear);
        }

        if self.graph.would_create_cycle(pos, &new_precedents) {
            log::debug!("rejected edit at {}: would create a circular dependency", pos);
            return Err(SheetError::CircularDependency(CircularDependencyException));
        }

        self.graph.set_dependencies(pos, &new_precedents);
        self.cells.insert(pos, candidate);
        log::debug!("committed edit at {}", pos);

        let mut invalidated = 0usize;
        self.graph.invalidate_from(pos, |p| {
            invalidated += 1;
            self.cells.get(&p).map(Cell::invalidate).unwrap_or(true)
        });
        log::trace!("invalidated {} dependent cell(s) below {}", invalidated, pos);

        Ok(())
    }

    /// The cell at `pos`, if allocated.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        Ok(self.cells.get(&pos))
    }

    /// Resets `pos` to Empty through the full edit protocol. A no-op if the
    /// slot was never allocated.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        if self.cells.contains_key(&pos) {
            self.set_cell(pos, "")?;
        }
        Ok(())
    }

    /// The current value at `pos`, recursively evaluating and memoizing
    /// formula cells. Unallocated positions evaluate to Empty.
    pub fn value(&self, pos: Position) -> CellValue {
        match self.cells.get(&pos) {
            Some(cell) => cell.value(|p| self.value(p)),
            None => CellValue::Empty,
        }
    }

    /// Smallest bounding rectangle containing every cell with non-empty text.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (pos, cell) in &self.cells {
            if !cell.text().is_empty() {
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
            }
        }
        size
    }

    /// Writes the sheet's values, tab-separated within a row, newline
    /// terminated per row, over the printable-size rectangle.
    pub fn print_values(&self, out: &mut impl Write) -> io::Result<()> {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                write!(out, "{}", self.value(Position::new(row, col)))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Writes the sheet's raw texts, same layout as `print_values`.
    pub fn print_texts(&self, out: &mut impl Write) -> io::Result<()> {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                let pos = Position::new(row, col);
                if let Some(cell) = self.cells.get(&pos) {
                    write!(out, "{}", cell.text())?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
