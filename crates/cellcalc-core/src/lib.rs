//! # cellcalc-core
//!
//! Core data structures for the cellcalc formula engine.
//!
//! This crate provides the fundamental types used throughout cellcalc:
//! - [`Coordinate`], [`CellRange`] and [`SheetBounds`] - Cell addressing and grid size
//! - [`CellError`] - The error tokens a cell can display
//! - [`Grid`] and the [`CellStore`] trait - Where raw cell entries live
//! - [`Style`] - Per-cell style flags
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{CellStore, Coordinate, Grid};
//!
//! let mut grid = Grid::new();
//!
//! // Using string addresses
//! grid.set_cell_formula("A1", "=B1*2").unwrap();
//!
//! // Or using coordinates (0-based column, row)
//! grid.set_cell_formula_at(Coordinate::new(1, 0), "21").unwrap();
//!
//! assert_eq!(grid.formula(Coordinate::new(0, 0)), Some("=B1*2"));
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod style;

// Re-exports for convenience
pub use cell::{
    is_valid_address_text, Cell, CellError, CellRange, CellRangeIterator, Coordinate,
    SheetBounds, DEFAULT_COLUMNS, DEFAULT_ROWS, MAX_ADDRESSABLE_COLUMNS, MAX_ADDRESSABLE_ROWS,
};
pub use error::{Error, Result};
pub use grid::{CellStore, Grid};
pub use style::{toggle_style_flags, HorizontalAlignment, Style, StyleFlag};
