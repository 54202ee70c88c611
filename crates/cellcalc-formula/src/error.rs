//! Formula error types

use cellcalc_core::CellError;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// Evaluation never surfaces these to a cell directly: [`FormulaError::to_cell_error`]
/// picks the token the cell displays instead.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Expression nests deeper than the configured limit
    #[error("Formula nests deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Malformed function registration
    #[error("Invalid function registration: {0}")]
    Registry(String),
}

impl FormulaError {
    /// The error token a cell displays when its formula fails this way
    pub fn to_cell_error(&self) -> CellError {
        match self {
            FormulaError::NestingTooDeep(_) => CellError::Depth,
            _ => CellError::Name,
        }
    }
}
