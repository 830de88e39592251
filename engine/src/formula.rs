//! FILENAME: engine/src/formula.rs
//! PURPOSE: Wraps a parsed formula AST with evaluation and canonical printing.
//! CONTEXT: `Formula::parse` is the probe-time entry point (Cell::from_text);
//! `Formula::evaluate` is invoked lazily by Cell::value, threading a
//! sheet-wide lookup closure down through nested cell references.

use std::collections::HashSet;

use parser::{BinaryOperator, Expression};

use crate::error::FormulaException;
use crate::position::Position;
use crate::value::{CellValue, FormulaError};

/// A parsed, evaluatable formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: Expression,
}

impl Formula {
    /// Parses formula text (already stripped of the leading '=').
    pub fn parse(expression: &str) -> Result<Formula, FormulaException> {
        let ast = parser::parse(expression)?;
        Ok(Formula { ast })
    }

    /// Evaluates the formula against a sheet lookup closure.
    pub fn evaluate(
        &self,
        lookup: impl Fn(Position) -> CellValue,
    ) -> Result<f64, FormulaError> {
        eval(&self.ast, &lookup)
    }

    /// Positions referenced by this formula's AST, deduplicated, first
    /// occurrence order, with out-of-bounds references filtered out.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_refs(&self.ast, &mut seen, &mut out);
        out
    }

    /// The canonical printable form of this formula's AST (minimal parens).
    pub fn expression(&self) -> String {
        print_expr(&self.ast, 0)
    }
}

fn eval(expr: &Expression, lookup: &impl Fn(Position) -> CellValue) -> Result<f64, FormulaError> {
    match expr {
        Expression::Number(n) => Ok(*n),
        Expression::CellRef(r) => {
            let pos = Position::from_col_row(&r.col, r.row).ok_or(FormulaError::Ref)?;
            match lookup(pos) {
                CellValue::Empty => Ok(0.0),
                CellValue::Number(n) => Ok(n),
                CellValue::Text(s) => {
                    if s.is_empty() {
                        Ok(0.0)
                    } else {
                        s.parse::<f64>().map_err(|_| FormulaError::Value)
                    }
                }
                CellValue::Error(e) => Err(e),
            }
        }
        Expression::Neg(inner) => Ok(-eval(inner, lookup)?),
        Expression::BinaryOp { left, op, right } => {
            let l = eval(left, lookup)?;
            let r = eval(right, lookup)?;
            let result = match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Sub => l - r,
                BinaryOperator::Mul => l * r,
                BinaryOperator::Div => {
                    if r == 0.0 {
                        return Err(FormulaError::Div0);
                    }
                    l / r
                }
            };
            if result.is_finite() {
                Ok(result)
            } else {
                Err(FormulaError::Div0)
            }
        }
    }
}

fn collect_refs(expr: &Expression, seen: &mut HashSet<Position>, out: &mut Vec<Position>) {
    match expr {
        Expression::Number(_) => {}
        Expression::CellRef(r) => {
            if let Some(pos) = Position::from_col_row(&r.col, r.row) {
                if seen.insert(pos) {
                    out.push(pos);
                }
            }
        }
        Expression::Neg(inner) => collect_refs(inner, seen, out),
        Expression::BinaryOp { left, right, .. } => {
            collect_refs(left, seen, out);
            collect_refs(right, seen, out);
        }
    }
}

/// Precedence of unary minus: binds tighter than `* /`.
const NEG_PRECEDENCE: u8 = 3;
/// Precedence of an atomic term (number or cell reference).
const ATOM_PRECEDENCE: u8 = 4;

fn print_expr(expr: &Expression, min_prec: u8) -> String {
    let (rendered, prec) = match expr {
        Expression::Number(n) => (format!("{}", n), ATOM_PRECEDENCE),
        Expression::CellRef(r) => (format!("{}{}", r.col, r.row), ATOM_PRECEDENCE),
        Expression::Neg(inner) => (format!("-{}", print_expr(inner, NEG_PRECEDENCE)), NEG_PRECEDENCE),
        Expression::BinaryOp { left, op, right } => {
            let p = op.precedence();
            let l = print_expr(left, p);
            let r = print_expr(right, p + 1);
            (format!("{}{}{}", l, op, r), p)
        }
    };

    if prec < min_prec {
        format!("({})", rendered)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_empty(_: Position) -> CellValue {
        CellValue::Empty
    }

    #[test]
    fn evaluates_arithmetic() {
        let f = Formula::parse("1+2*3").unwrap();
        assert_eq!(f.evaluate(lookup_empty), Ok(7.0));
    }

    #[test]
    fn division_by_zero_is_div0() {
        let f = Formula::parse("1/0").unwrap();
        assert_eq!(f.evaluate(lookup_empty), Err(FormulaError::Div0));
    }

    #[test]
    fn non_finite_result_is_div0() {
        let f = Formula::parse("1e308*10").unwrap();
        assert_eq!(f.evaluate(lookup_empty), Err(FormulaError::Div0));
    }

    #[test]
    fn unset_reference_is_zero() {
        let f = Formula::parse("A1+1").unwrap();
        assert_eq!(f.evaluate(lookup_empty), Ok(1.0));
    }

    #[test]
    fn text_reference_parses_as_number() {
        let f = Formula::parse("A1+1").unwrap();
        let lookup = |_: Position| CellValue::Text("41".to_string());
        assert_eq!(f.evaluate(lookup), Ok(42.0));
    }

    #[test]
    fn non_numeric_text_reference_is_value_error() {
        let f = Formula::parse("A1+1").unwrap();
        let lookup = |_: Position| CellValue::Text("hello".to_string());
        assert_eq!(f.evaluate(lookup), Err(FormulaError::Value));
    }

    #[test]
    fn error_reference_propagates() {
        let f = Formula::parse("A1+1").unwrap();
        let lookup = |_: Position| CellValue::Error(FormulaError::Ref);
        assert_eq!(f.evaluate(lookup), Err(FormulaError::Ref));
    }

    #[test]
    fn out_of_bounds_reference_is_ref_error() {
        let f = Formula::parse("A999999999+1").unwrap();
        assert_eq!(f.evaluate(lookup_empty), Err(FormulaError::Ref));
    }

    #[test]
    fn referenced_cells_dedup_and_order() {
        let f = Formula::parse("A1+B1+A1").unwrap();
        let refs = f.referenced_cells();
        assert_eq!(
            refs,
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn canonical_print_minimal_parens() {
        assert_eq!(Formula::parse("1+2*3").unwrap().expression(), "1+2*3");
        assert_eq!(Formula::parse("(1+2)*3").unwrap().expression(), "(1+2)*3");
        assert_eq!(Formula::parse("10-2-3").unwrap().expression(), "10-2-3");
        assert_eq!(Formula::parse("10-(2-3)").unwrap().expression(), "10-(2-3)");
        assert_eq!(Formula::parse("-5+1").unwrap().expression(), "-5+1");
        assert_eq!(Formula::parse("-(1+2)").unwrap().expression(), "-(1+2)");
    }

    #[test]
    fn print_is_idempotent() {
        let original = "1+2*(3-4)/5";
        let once = Formula::parse(original).unwrap().expression();
        let twice = Formula::parse(&once).unwrap().expression();
        assert_eq!(once, twice);
    }
}
