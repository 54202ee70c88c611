//! Formula evaluator
//!
//! Turns raw cell entries into display strings, evaluating formula ASTs along the way.

use crate::arithmetic::{apply_binary, apply_unary};
use crate::ast::FormulaExpr;
use crate::classify::{bare_symbol, classify, Entry};
use crate::error::{FormulaError, FormulaResult};
use crate::format::{
    collapse_negative_signs, drop_leading_equals, format_calc_result, format_number,
    is_numeric_text,
};
use crate::functions::FunctionRegistry;
use crate::parser::parse_expression;
use crate::resolver::ReferenceResolver;
use cellcalc_core::{CellError, CellRange, CellStore, Coordinate};
use log::debug;

/// Default limit for reference chains and expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    Text(String),
    Error(CellError),
    /// Cells of a range argument, row by row
    Array(Vec<Vec<FormulaValue>>),
    Empty,
}

impl FormulaValue {
    /// Convert to number, if possible
    pub fn as_number(&self) -> Option<f64> {
        self.to_number().ok()
    }

    /// Force conversion to number for arithmetic
    ///
    /// Empty is `0`, numeric text is parsed, errors come back unchanged and anything
    /// else is `#NAME?`.
    pub fn to_number(&self) -> Result<f64, CellError> {
        match self {
            FormulaValue::Number(n) => Ok(*n),
            FormulaValue::Empty => Ok(0.0),
            FormulaValue::Text(s) if is_numeric_text(s) => {
                s.trim().parse().map_err(|_| CellError::Name)
            }
            FormulaValue::Error(e) => Err(*e),
            FormulaValue::Text(_) | FormulaValue::Array(_) => Err(CellError::Name),
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, FormulaValue::Error(_))
    }

    /// Get the error if this is one
    pub fn get_error(&self) -> Option<CellError> {
        match self {
            FormulaValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Read a display string back as a value
    ///
    /// Empty text is [`FormulaValue::Empty`], error tokens are errors and numeric text
    /// is a number.
    pub fn from_display(display: &str) -> Self {
        if display.is_empty() {
            return FormulaValue::Empty;
        }
        if let Some(err) = CellError::from_str(display) {
            return FormulaValue::Error(err);
        }
        if is_numeric_text(display) {
            if let Ok(n) = display.trim().parse() {
                return FormulaValue::Number(n);
            }
        }
        FormulaValue::Text(display.to_string())
    }

    /// Render the result of a formula for display
    ///
    /// A formula's result must be a number: empty renders as `0`, numeric text is
    /// canonicalised, and other text or a bare range is `#NAME?`.
    pub fn to_display(&self) -> String {
        match self {
            FormulaValue::Number(n) => match format_number(*n) {
                Ok(text) => format_calc_result(&text),
                Err(e) => e.as_str().to_string(),
            },
            FormulaValue::Error(e) => e.as_str().to_string(),
            FormulaValue::Empty => "0".to_string(),
            FormulaValue::Text(s) if is_numeric_text(s) => format_calc_result(s),
            FormulaValue::Text(_) | FormulaValue::Array(_) => CellError::Name.as_str().to_string(),
        }
    }
}

/// Options for formula evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaluationOptions {
    /// Longest chain of cell references, and deepest expression nesting, before
    /// evaluation gives up with `#DEPTH!`
    pub max_depth: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Context for formula evaluation
///
/// One context covers one snapshot of the store: cell values resolved through it are
/// memoised until it is dropped.
pub struct EvaluationContext<'a> {
    /// Where referenced cells are read from
    pub store: &'a dyn CellStore,
    /// Functions callable from formulas
    pub registry: &'a FunctionRegistry,
    pub options: EvaluationOptions,
    pub(crate) resolver: ReferenceResolver,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(
        store: &'a dyn CellStore,
        registry: &'a FunctionRegistry,
        options: EvaluationOptions,
    ) -> Self {
        Self {
            store,
            registry,
            options,
            resolver: ReferenceResolver::new(),
        }
    }

    /// Evaluate a raw cell entry to its display string
    pub fn evaluate(&self, raw: &str) -> String {
        match classify(raw) {
            Entry::Text(rest) => rest.to_string(),
            Entry::Number(text) => format_calc_result(text),
            Entry::Literal(text) => text.to_string(),
            Entry::Formula(formula) => self.evaluate_formula(formula),
        }
    }

    /// Display string of the cell at `coord`
    pub fn evaluate_cell(&self, coord: Coordinate) -> String {
        self.resolver.resolve(self, coord).display
    }

    /// Value of the cell at `coord`, as seen by formulas referencing it
    pub fn cell_value(&self, coord: Coordinate) -> FormulaValue {
        self.resolver.resolve(self, coord).value
    }

    /// Values of every cell in `range`, row by row
    pub fn range_values(&self, range: CellRange) -> FormulaValue {
        let mut rows = Vec::with_capacity(range.row_count() as usize);
        for row in range.start.row..=range.end.row {
            let mut cols = Vec::with_capacity(range.col_count() as usize);
            for col in range.start.col..=range.end.col {
                cols.push(self.cell_value(Coordinate::new(col, row)));
            }
            rows.push(cols);
        }
        FormulaValue::Array(rows)
    }

    fn evaluate_formula(&self, formula: &str) -> String {
        if let Some(symbol) = bare_symbol(formula) {
            return symbol.to_string();
        }

        let body = drop_leading_equals(formula);
        if body.trim().is_empty() {
            return String::new();
        }

        let body = collapse_negative_signs(body, true);
        let result = parse_expression(&body, self.options.max_depth)
            .and_then(|expr| evaluate_expression(&expr, self));

        match result {
            Ok(value) => value.to_display(),
            Err(err) => {
                debug!("Formula {:?} failed: {}", formula, err);
                err.to_cell_error().as_str().to_string()
            }
        }
    }
}

/// Evaluate a raw cell entry against a store
///
/// # Example
/// ```rust
/// use cellcalc_core::Grid;
/// use cellcalc_formula::{evaluate, FunctionRegistry};
///
/// let grid = Grid::new();
/// let registry = FunctionRegistry::builtin();
///
/// assert_eq!(evaluate("'AbCd", &grid, registry), "AbCd");
/// assert_eq!(evaluate("=2--3", &grid, registry), "5");
/// assert_eq!(evaluate("=AVERAGE(X1:X1)", &grid, registry), "#DIV0!");
/// ```
pub fn evaluate(raw: &str, store: &dyn CellStore, registry: &FunctionRegistry) -> String {
    evaluate_with_options(raw, store, registry, EvaluationOptions::default())
}

/// Evaluate a raw cell entry with custom options
pub fn evaluate_with_options(
    raw: &str,
    store: &dyn CellStore,
    registry: &FunctionRegistry,
    options: EvaluationOptions,
) -> String {
    EvaluationContext::new(store, registry, options).evaluate(raw)
}

/// Evaluate a formula expression
pub fn evaluate_expression(
    expr: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(FormulaValue::Number(*n)),
        FormulaExpr::Error(e) => Ok(FormulaValue::Error(*e)),
        FormulaExpr::Missing => Ok(FormulaValue::Empty),

        // === References ===
        FormulaExpr::CellRef(cell_ref) => Ok(match cell_ref.resolve(ctx.store.bounds()) {
            Ok(coord) => ctx.cell_value(coord),
            Err(e) => FormulaValue::Error(e),
        }),

        // Ranges and bare names only mean something as function arguments
        FormulaExpr::RangeRef(_) | FormulaExpr::NameRef(_) => {
            Ok(FormulaValue::Error(CellError::Name))
        }

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate_expression(left, ctx)?;
            let right = evaluate_expression(right, ctx)?;
            Ok(apply_binary(*op, &left, &right))
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let operand = evaluate_expression(operand, ctx)?;
            Ok(apply_unary(*op, &operand))
        }

        // === Functions ===
        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),
    }
}

/// Evaluate a function call
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let def = ctx
        .registry
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    if !def.accepts(args.len()) {
        return Err(FormulaError::ArgumentCount {
            function: def.name.to_string(),
            expected: def.arity(),
            actual: args.len(),
        });
    }

    let values = args
        .iter()
        .map(|arg| evaluate_argument(arg, ctx))
        .collect::<FormulaResult<Vec<_>>>()?;

    (def.implementation)(&values, ctx)
}

/// Evaluate one function argument
///
/// Ranges expand to their cells and bare names are literal text.
fn evaluate_argument(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match expr {
        FormulaExpr::RangeRef(range_ref) => Ok(match range_ref.resolve(ctx.store.bounds()) {
            Ok(range) => ctx.range_values(range),
            Err(e) => FormulaValue::Error(e),
        }),
        FormulaExpr::NameRef(name) => Ok(FormulaValue::Text(name.clone())),
        _ => evaluate_expression(expr, ctx),
    }
}
