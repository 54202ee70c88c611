//! Error types for cellcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellcalc-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u16, u16),

    /// Sheet dimensions that cannot be addressed with 1-2 letters and 1-3 digits
    #[error("Invalid sheet bounds {columns}x{rows}: {reason}")]
    InvalidBounds {
        columns: u16,
        rows: u32,
        reason: &'static str,
    },

    /// Unknown style flag
    #[error("Invalid style flag: {0:?}")]
    InvalidStyleFlag(char),
}
