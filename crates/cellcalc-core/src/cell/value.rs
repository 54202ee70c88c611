//! Error tokens produced by evaluation

use std::fmt;

/// Recoverable evaluation failures
///
/// These are values, not Rust errors: a cell that fails to evaluate displays the
/// token, and the token propagates into any formula that consumes the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #REF! - Address token outside the grid
    Ref,
    /// #DIV0! - Division by zero, or AVERAGE over nothing
    Div0,
    /// #NAME? - Text that is not valid arithmetic
    Name,
    /// #CIRCULAR! - A cell depends on itself
    Circular,
    /// #DEPTH! - Reference chain deeper than the configured limit
    Depth,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Ref => "#REF!",
            CellError::Div0 => "#DIV0!",
            CellError::Name => "#NAME?",
            CellError::Circular => "#CIRCULAR!",
            CellError::Depth => "#DEPTH!",
        }
    }

    /// Parse an error string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#REF!" => Some(CellError::Ref),
            "#DIV0!" => Some(CellError::Div0),
            "#NAME?" => Some(CellError::Name),
            "#CIRCULAR!" => Some(CellError::Circular),
            "#DEPTH!" => Some(CellError::Depth),
            _ => None,
        }
    }

    /// Errors raised by the resolver's recursion guard
    ///
    /// Aggregates that otherwise tolerate bad items always surface these.
    pub fn is_structural(&self) -> bool {
        matches!(self, CellError::Circular | CellError::Depth)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
