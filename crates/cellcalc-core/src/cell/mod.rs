//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Coordinate`] - A cell's location, and the address codec (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`SheetBounds`] - Grid dimensions
//! - [`CellError`] - Error tokens produced by evaluation
//! - [`Cell`] - Raw cell contents (entry and style flags)

mod address;
mod storage;
mod value;

pub use address::{
    is_valid_address_text, CellRange, CellRangeIterator, Coordinate, SheetBounds,
    DEFAULT_COLUMNS, DEFAULT_ROWS, MAX_ADDRESSABLE_COLUMNS, MAX_ADDRESSABLE_ROWS,
};
pub use storage::Cell;
pub use value::CellError;
