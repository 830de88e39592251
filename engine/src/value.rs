//! FILENAME: engine/src/value.rs
//! PURPOSE: The value types a cell can hold: a tagged CellValue and the
//! closed set of evaluation errors a formula can raise.

use std::fmt;

/// A formula evaluation error. Carried as a value (`CellValue::Error`), not
/// as a propagated `Result`, once it reaches the public boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaError {
    /// A referenced position is out of grid bounds.
    Ref,
    /// A referenced text cell's contents don't parse as a number.
    Value,
    /// Division by zero, or a result that is not finite.
    Div0,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Div0 => "#DIV/0!",
        };
        write!(f, "{}", s)
    }
}

/// A cell's current value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_forms() {
        assert_eq!(FormulaError::Ref.to_string(), "#REF!");
        assert_eq!(FormulaError::Value.to_string(), "#VALUE!");
        assert_eq!(FormulaError::Div0.to_string(), "#DIV/0!");
    }

    #[test]
    fn value_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Text("hi".to_string()).to_string(), "hi");
        assert_eq!(CellValue::Error(FormulaError::Div0).to_string(), "#DIV/0!");
    }
}
