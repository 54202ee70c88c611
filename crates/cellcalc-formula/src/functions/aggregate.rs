//! Aggregate functions

use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};
use cellcalc_core::CellError;

/// Every scalar item of an argument list, with ranges flattened row by row
fn items<'a>(args: &'a [FormulaValue]) -> impl Iterator<Item = &'a FormulaValue> + 'a {
    args.iter().flat_map(|arg| match arg {
        FormulaValue::Array(rows) => rows.iter().flatten().collect::<Vec<_>>(),
        other => vec![other],
    })
}

/// Sum of the numeric items, or the first error
///
/// Empty and text items (including numeric text from escaped cells) contribute
/// nothing. Error items are not skipped like other non-numeric items: the first one
/// is returned, so errors propagate through SUM and AVERAGE.
fn sum(args: &[FormulaValue]) -> Result<f64, CellError> {
    let mut sum = 0.0;
    for item in items(args) {
        match item {
            FormulaValue::Number(n) => sum += n,
            FormulaValue::Error(e) => return Err(*e),
            _ => {} // Ignore non-numeric
        }
    }
    Ok(sum)
}

/// Number of non-empty items
///
/// Ordinary error items count like any other value. `#CIRCULAR!` and `#DEPTH!` are
/// returned instead, since the count would depend on where evaluation started.
fn count(args: &[FormulaValue]) -> Result<usize, CellError> {
    let mut count = 0;
    for item in items(args) {
        match item {
            FormulaValue::Empty => {}
            FormulaValue::Error(e) if e.is_structural() => return Err(*e),
            _ => count += 1,
        }
    }
    Ok(count)
}

/// SUM function
pub fn fn_sum(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(match sum(args) {
        Ok(sum) => FormulaValue::Number(sum),
        Err(e) => FormulaValue::Error(e),
    })
}

/// COUNT function
pub fn fn_count(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(match count(args) {
        Ok(count) => FormulaValue::Number(count as f64),
        Err(e) => FormulaValue::Error(e),
    })
}

/// AVERAGE function: SUM / COUNT, `#DIV0!` when there is nothing to count
pub fn fn_average(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let total = match sum(args) {
        Ok(total) => total,
        Err(e) => return Ok(FormulaValue::Error(e)),
    };

    Ok(match count(args) {
        Ok(0) => FormulaValue::Error(CellError::Div0),
        Ok(count) => FormulaValue::Number(total / count as f64),
        Err(e) => FormulaValue::Error(e),
    })
}
