//! Formula Abstract Syntax Tree types

use cellcalc_core::{CellError, CellRange, Coordinate, SheetBounds};

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// Error literal
    Error(CellError),

    // === References ===
    /// Single cell reference
    CellRef(CellReference),
    /// Range reference
    RangeRef(RangeReference),
    /// Bare identifier that is neither an address nor a function call
    NameRef(String),

    /// Empty item in a function argument list, as in `SUM(1,,2)`
    Missing,

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    // === Function call ===
    Function {
        name: String,
        args: Vec<FormulaExpr>,
    },
}

/// Cell reference as written in the formula
///
/// The address is kept as upper-cased text: whether it lies inside the grid depends
/// on the store the formula is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellReference {
    pub address: String,
}

impl CellReference {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self {
            address: address.into().to_ascii_uppercase(),
        }
    }

    /// Resolve to a coordinate inside `bounds`
    pub fn resolve(&self, bounds: SheetBounds) -> Result<Coordinate, CellError> {
        Coordinate::parse(&self.address, bounds).map_err(|_| CellError::Ref)
    }
}

/// Range reference `start:end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReference {
    pub start: CellReference,
    pub end: CellReference,
}

impl RangeReference {
    /// Resolve both corners; fails if either lies outside `bounds`
    pub fn resolve(&self, bounds: SheetBounds) -> Result<CellRange, CellError> {
        Ok(CellRange::new(
            self.start.resolve(bounds)?,
            self.end.resolve(bounds)?,
        ))
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}
