//! FILENAME: engine/src/error.rs
//! PURPOSE: Edit-time error surface raised by Sheet/Cell/Formula operations.
//! CONTEXT: These are synchronous Result errors for operations that fail
//! before any state is mutated — distinct from FormulaError, which is a
//! value carried inside CellValue::Error once a formula is installed.

use thiserror::Error;

/// Raised when formula text fails to parse.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("formula parse error: {message}")]
pub struct FormulaException {
    pub message: String,
}

impl From<parser::ParseError> for FormulaException {
    fn from(e: parser::ParseError) -> Self {
        FormulaException {
            message: e.message,
        }
    }
}

/// Raised when an edit would close a cycle in the dependency graph.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("circular dependency detected")]
pub struct CircularDependencyException;

/// The error surface of `Sheet`'s public operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("invalid position")]
    InvalidPosition,

    #[error(transparent)]
    Formula(#[from] FormulaException),

    #[error(transparent)]
    CircularDependency(#[from] CircularDependencyException),
}
