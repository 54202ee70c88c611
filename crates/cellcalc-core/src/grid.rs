//! Grid storage and the read-only store interface used by the engine

use crate::cell::{Cell, CellRange, Coordinate, SheetBounds};
use crate::error::{Error, Result};
use crate::style::{toggle_style_flags, StyleFlag};
use ahash::AHashMap;

/// Read access to raw cell contents
///
/// The evaluation engine only ever reads through this trait. Hosts that keep
/// cells somewhere other than [`Grid`] implement it directly.
pub trait CellStore {
    /// Raw entry of the cell at `coord`, if any
    fn formula(&self, coord: Coordinate) -> Option<&str>;

    /// Style flag string of the cell at `coord`, if any
    fn style(&self, coord: Coordinate) -> Option<&str>;

    /// Dimensions of the store
    fn bounds(&self) -> SheetBounds {
        SheetBounds::default()
    }
}

/// A sparse `columns x rows` grid of cells
///
/// Cells that were never written (or were cleared) take no space and read as empty.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    bounds: SheetBounds,
    cells: AHashMap<Coordinate, Cell>,
}

impl Grid {
    /// Create an empty grid with the default 702x702 bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty grid with custom bounds
    pub fn with_bounds(bounds: SheetBounds) -> Self {
        Self {
            bounds,
            cells: AHashMap::new(),
        }
    }

    /// Grid dimensions
    pub fn bounds(&self) -> SheetBounds {
        self.bounds
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let coord = Coordinate::parse(address, self.bounds)?;
        Ok(self.cells.get(&coord))
    }

    /// Get a cell by coordinate
    pub fn cell_at(&self, coord: Coordinate) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-empty cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(c, cell)| (*c, cell)).collect();
        cells.sort_unstable_by_key(|(c, _)| *c);
        cells.into_iter()
    }

    /// Smallest range covering every non-empty cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut coords = self.cells.keys();
        let first = *coords.next()?;
        Some(coords.fold(CellRange::single(first), |range, c| {
            CellRange::new(
                Coordinate::new(range.start.col.min(c.col), range.start.row.min(c.row)),
                Coordinate::new(range.end.col.max(c.col), range.end.row.max(c.row)),
            )
        }))
    }

    // === Cell Modification ===

    /// Set a cell's raw entry by address string
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let coord = Coordinate::parse(address, self.bounds)?;
        self.set_cell_formula_at(coord, formula)
    }

    /// Set a cell's raw entry by coordinate
    pub fn set_cell_formula_at(&mut self, coord: Coordinate, formula: &str) -> Result<()> {
        self.check_bounds(coord)?;
        self.update(coord, |cell| cell.formula = formula.to_string());
        Ok(())
    }

    /// Set a cell's style flag string by address string
    pub fn set_cell_style(&mut self, address: &str, style: &str) -> Result<()> {
        let coord = Coordinate::parse(address, self.bounds)?;
        self.set_cell_style_at(coord, style)
    }

    /// Set a cell's style flag string by coordinate
    pub fn set_cell_style_at(&mut self, coord: Coordinate, style: &str) -> Result<()> {
        self.check_bounds(coord)?;
        self.update(coord, |cell| cell.style = style.to_string());
        Ok(())
    }

    /// Toggle one style flag on a cell, returning the new flag string
    pub fn toggle_cell_style_at(&mut self, coord: Coordinate, flag: StyleFlag) -> Result<String> {
        self.check_bounds(coord)?;
        let current = self.style(coord).unwrap_or_default();
        let toggled = toggle_style_flags(current, flag);
        self.update(coord, |cell| cell.style = toggled.clone());
        Ok(toggled)
    }

    /// Reset a cell to empty by address string
    pub fn clear_cell(&mut self, address: &str) -> Result<()> {
        let coord = Coordinate::parse(address, self.bounds)?;
        self.clear_cell_at(coord);
        Ok(())
    }

    /// Reset a cell to empty
    pub fn clear_cell_at(&mut self, coord: Coordinate) {
        self.cells.remove(&coord);
    }

    fn update(&mut self, coord: Coordinate, f: impl FnOnce(&mut Cell)) {
        let cell = self.cells.entry(coord).or_default();
        f(cell);
        if cell.is_empty() {
            self.cells.remove(&coord);
        }
    }

    fn check_bounds(&self, coord: Coordinate) -> Result<()> {
        if coord.col >= self.bounds.columns() {
            return Err(Error::ColumnOutOfBounds(coord.col, self.bounds.last_column()));
        }
        if coord.row >= self.bounds.rows() {
            return Err(Error::RowOutOfBounds(coord.row, self.bounds.last_row()));
        }
        Ok(())
    }
}

impl CellStore for Grid {
    fn formula(&self, coord: Coordinate) -> Option<&str> {
        self.cells
            .get(&coord)
            .map(|c| c.formula.as_str())
            .filter(|f| !f.is_empty())
    }

    fn style(&self, coord: Coordinate) -> Option<&str> {
        self.cells
            .get(&coord)
            .map(|c| c.style.as_str())
            .filter(|s| !s.is_empty())
    }

    fn bounds(&self) -> SheetBounds {
        self.bounds
    }
}
