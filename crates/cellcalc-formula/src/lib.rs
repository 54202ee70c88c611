//! # cellcalc-formula
//!
//! Formula parser and evaluator for cellcalc.
//!
//! This crate provides:
//! - Entry classification (text escape, number, formula, literal)
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → value), with recursive reference resolution
//! - The built-in aggregate functions `SUM`, `COUNT` and `AVERAGE`
//! - Canonical formatting of numeric results
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::Grid;
//! use cellcalc_formula::{evaluate, FunctionRegistry};
//!
//! let mut grid = Grid::new();
//! grid.set_cell_formula("A1", "=2").unwrap();
//! grid.set_cell_formula("A2", "=A1*3").unwrap();
//!
//! let registry = FunctionRegistry::builtin();
//! assert_eq!(evaluate("=SUM(A1:A2)", &grid, registry), "8");
//! assert_eq!(evaluate("=1/0", &grid, registry), "#DIV0!");
//! ```

pub mod arithmetic;
pub mod ast;
pub mod classify;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod functions;
pub mod parser;
mod resolver;

pub use arithmetic::evaluate_arithmetic;
pub use ast::{BinaryOperator, CellReference, FormulaExpr, RangeReference, UnaryOperator};
pub use classify::{classify, Entry};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, evaluate_expression, evaluate_with_options, EvaluationContext, EvaluationOptions,
    FormulaValue, DEFAULT_MAX_DEPTH,
};
pub use format::format_calc_result;
pub use functions::{FunctionDef, FunctionRegistry};
pub use parser::{parse_expression, parse_formula};
