//! FILENAME: engine/src/cell.rs
//! PURPOSE: A single sheet slot: empty, literal text, or a formula with a
//! lazily populated, invalidatable cache.

use std::cell::RefCell;

use crate::error::FormulaException;
use crate::formula::Formula;
use crate::position::Position;
use crate::value::CellValue;

/// The escape character: a leading apostrophe forces text that would
/// otherwise look like a formula (or start with `'` itself) to be treated
/// as plain text.
const ESCAPE_SIGN: char = '\'';
const FORMULA_SIGN: char = '=';

/// The content of a single cell.
#[derive(Debug)]
pub enum Cell {
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        cache: RefCell<Option<CellValue>>,
    },
}

impl Cell {
    /// Builds a *candidate* cell from raw user-entered text. Does not touch
    /// any existing cell or the dependency graph — this is the probe step
    /// of the edit protocol.
    pub fn from_text(text: &str) -> Result<Cell, FormulaException> {
        if text.is_empty() {
            return Ok(Cell::Empty);
        }

        if text.len() >= 2 && text.starts_with(FORMULA_SIGN) {
            let formula = Formula::parse(&text[1..])?;
            return Ok(Cell::Formula {
                formula,
                cache: RefCell::new(None),
            });
        }

        Ok(Cell::Text(text.to_string()))
    }

    /// An empty cell; always succeeds.
    pub fn clear() -> Cell {
        Cell::Empty
    }

    /// The cell's current value, evaluating and memoizing a Formula cell's
    /// result on first access.
    pub fn value(&self, lookup: impl Fn(Position) -> CellValue) -> CellValue {
        match self {
            Cell::Empty => CellValue::Empty,
            Cell::Text(raw) => {
                if let Some(stripped) = raw.strip_prefix(ESCAPE_SIGN) {
                    CellValue::Text(stripped.to_string())
                } else {
                    CellValue::Text(raw.clone())
                }
            }
            Cell::Formula { formula, cache } => {
                if let Some(v) = cache.borrow().as_ref() {
                    return v.clone();
                }
                let value = match formula.evaluate(lookup) {
                    Ok(n) => CellValue::Number(n),
                    Err(e) => CellValue::Error(e),
                };
                *cache.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// The original user-facing text. For a Formula cell this is the
    /// canonical re-printed form, not necessarily the original input.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(raw) => raw.clone(),
            Cell::Formula { formula, .. } => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Positions this cell's formula references; empty for Empty/Text.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            Cell::Formula { formula, .. } => formula.referenced_cells(),
            _ => Vec::new(),
        }
    }

    /// Clears a Formula cell's cache if present, returning whether the
    /// invalidation walk should continue into this cell's own dependents.
    /// Non-Formula cells have nothing to invalidate but must still be
    /// walked through to reach Formula cells further downstream.
    pub fn invalidate(&self) -> bool {
        match self {
            Cell::Formula { cache, .. } => {
                let mut cache = cache.borrow_mut();
                if cache.is_some() {
                    *cache = None;
                    true
                } else {
                    false
                }
            }
            _ => true,
        }
    }
}
