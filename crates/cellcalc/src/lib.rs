//! # cellcalc
//!
//! A spreadsheet formula engine.
//!
//! Cellcalc turns raw cell entries (text, numbers or formulas) into the strings a
//! spreadsheet displays.
//!
//! ## Features
//!
//! - `A1`-style addresses and `A1:B10` ranges over a configurable grid
//! - Arithmetic with `+ - * /`, parentheses and sign runs such as `2--3`
//! - Recursive cell references with cycle and depth detection
//! - The aggregates `SUM`, `COUNT` and `AVERAGE`, plus user-registered functions
//! - Error values (`#REF!`, `#DIV0!`, `#NAME?`, `#CIRCULAR!`, `#DEPTH!`) that propagate
//!   instead of aborting
//! - Sheet-wide recalculation with alignment hints and statistics
//!
//! ## Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut grid = Grid::new();
//!
//! // Set cell entries
//! grid.set_cell_formula("A1", "=1").unwrap();
//! grid.set_cell_formula("A2", "=A1*2").unwrap();
//! grid.set_cell_formula("A3", "'not a number").unwrap();
//!
//! // Evaluate a single entry against the grid
//! assert_eq!(evaluate("=SUM(A1:A3)", &grid, FunctionRegistry::builtin()), "3");
//!
//! // Or recalculate every cell
//! let values = grid.calculate();
//! assert_eq!(values.value("A2"), Some("2"));
//! assert_eq!(values.stats.formula_count, 2);
//! ```

pub mod calculation;
pub mod prelude;

// Re-export calculation types
pub use calculation::{CalculatedCell, CalculationStats, GridCalculationExt, SheetValues};

// Re-export core types
pub use cellcalc_core::{
    // Addressing
    is_valid_address_text,
    // Styling
    toggle_style_flags,
    // Cell types
    Cell,
    CellError,
    CellRange,
    CellStore,
    Coordinate,
    // Error types
    Error,
    // Grid
    Grid,
    HorizontalAlignment,
    Result,
    SheetBounds,
    Style,
    StyleFlag,
    // Constants
    DEFAULT_COLUMNS,
    DEFAULT_ROWS,
};

// Re-export formula types
pub use cellcalc_formula::{
    evaluate, evaluate_arithmetic, evaluate_with_options, format_calc_result, parse_formula,
    EvaluationContext, EvaluationOptions, FormulaError, FormulaExpr, FormulaResult,
    FormulaValue, FunctionDef, FunctionRegistry,
};
