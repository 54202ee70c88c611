//! Arithmetic on formula values

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::evaluator::{FormulaValue, DEFAULT_MAX_DEPTH};
use crate::format::{collapse_negative_signs, drop_leading_equals, format_calc_result, format_number};
use crate::parser::parse_expression;
use cellcalc_core::CellError;

/// Apply a binary operator
///
/// An error operand wins (the left one first). Empty operands count as `0`, numeric
/// text is converted, and any other operand is `#NAME?`. Results that are not finite
/// are `#DIV0!`.
pub fn apply_binary(op: BinaryOperator, left: &FormulaValue, right: &FormulaValue) -> FormulaValue {
    let (l, r) = match (left.to_number(), right.to_number()) {
        (Ok(l), Ok(r)) => (l, r),
        (Err(e), _) | (_, Err(e)) => return FormulaValue::Error(e),
    };

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return FormulaValue::Error(CellError::Div0);
            }
            l / r
        }
    };

    number_or_div0(result)
}

/// Apply a unary operator
pub fn apply_unary(op: UnaryOperator, operand: &FormulaValue) -> FormulaValue {
    match (op, operand.to_number()) {
        (_, Err(e)) => FormulaValue::Error(e),
        (UnaryOperator::Negate, Ok(n)) => number_or_div0(-n),
    }
}

fn number_or_div0(n: f64) -> FormulaValue {
    if n.is_finite() {
        FormulaValue::Number(n)
    } else {
        FormulaValue::Error(CellError::Div0)
    }
}

/// Evaluate fully substituted arithmetic text
///
/// One leading `=` is dropped. An exact error token passes through; any other text
/// that still contains letters is `#NAME?`. Whitespace is removed, runs of minus signs
/// collapse, and the rest is evaluated with the usual precedence.
///
/// ```
/// use cellcalc_formula::evaluate_arithmetic;
///
/// assert_eq!(evaluate_arithmetic("=2--3"), "5");
/// assert_eq!(evaluate_arithmetic("= 1 + (2 * 3)"), "7");
/// assert_eq!(evaluate_arithmetic("=4/0"), "#DIV0!");
/// assert_eq!(evaluate_arithmetic("=#REF!"), "#REF!");
/// assert_eq!(evaluate_arithmetic("=1+abc"), "#NAME?");
/// ```
pub fn evaluate_arithmetic(text: &str) -> String {
    let text = drop_leading_equals(text);

    if let Some(err) = CellError::from_str(text.trim()) {
        return err.as_str().to_string();
    }
    if text.chars().any(|c| c.is_alphabetic()) {
        return CellError::Name.as_str().to_string();
    }

    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let collapsed = collapse_negative_signs(&compact, true);

    let value = match parse_expression(&collapsed, DEFAULT_MAX_DEPTH) {
        Ok(expr) => fold(&expr),
        Err(e) => FormulaValue::Error(e.to_cell_error()),
    };

    match value {
        FormulaValue::Number(n) => match format_number(n) {
            Ok(text) => format_calc_result(&text),
            Err(e) => e.as_str().to_string(),
        },
        FormulaValue::Error(e) => e.as_str().to_string(),
        _ => CellError::Name.as_str().to_string(),
    }
}

/// Evaluate an AST that holds nothing but numbers and operators
fn fold(expr: &FormulaExpr) -> FormulaValue {
    match expr {
        FormulaExpr::Number(n) => FormulaValue::Number(*n),
        FormulaExpr::Error(e) => FormulaValue::Error(*e),
        FormulaExpr::BinaryOp { op, left, right } => apply_binary(*op, &fold(left), &fold(right)),
        FormulaExpr::UnaryOp { op, operand } => apply_unary(*op, &fold(operand)),
        _ => FormulaValue::Error(CellError::Name),
    }
}
