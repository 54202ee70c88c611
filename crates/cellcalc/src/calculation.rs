//! Sheet-wide recalculation
//!
//! Evaluates every non-empty cell of a grid against one snapshot, the way a sheet is
//! refreshed after each edit.
//!
//! # Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut grid = Grid::new();
//! grid.set_cell_formula("A1", "10").unwrap();
//! grid.set_cell_formula("A2", "20").unwrap();
//! grid.set_cell_formula("A3", "=A1+A2").unwrap();
//!
//! let values = grid.calculate();
//! assert_eq!(values.value("A3"), Some("30"));
//! println!("Calculated {} cells", values.stats.cells_calculated);
//! ```

use crate::{
    CellError, Coordinate, EvaluationContext, EvaluationOptions, FunctionRegistry, Grid,
    HorizontalAlignment, SheetBounds, Style,
};
use cellcalc_formula::classify::{classify, Entry};
use cellcalc_formula::format::is_numeric_text;
use log::debug;

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Number of cells holding a formula
    pub formula_count: usize,
    /// Number of cells calculated
    pub cells_calculated: usize,
    /// Number of cells displaying an error token
    pub errors: usize,
    /// Number of cells caught in (or depending on) a circular reference
    pub circular_references: usize,
}

/// Display data for one calculated cell
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedCell {
    /// Displayed text
    pub value: String,
    /// Numbers align right unless the entry was text-escaped
    pub alignment: HorizontalAlignment,
    /// Decoded style flags
    pub style: Style,
}

/// Result of recalculating a grid
#[derive(Debug, Clone, Default)]
pub struct SheetValues {
    /// Calculated cells in row-major order
    cells: Vec<(Coordinate, CalculatedCell)>,
    bounds: SheetBounds,
    pub stats: CalculationStats,
}

impl SheetValues {
    /// Get a calculated cell by coordinate
    pub fn get(&self, coord: Coordinate) -> Option<&CalculatedCell> {
        self.cells
            .binary_search_by_key(&coord, |(c, _)| *c)
            .ok()
            .map(|i| &self.cells[i].1)
    }

    /// Displayed text of a cell by address string; `None` for empty or invalid cells
    pub fn value(&self, address: &str) -> Option<&str> {
        let coord = Coordinate::parse(address, self.bounds).ok()?;
        self.get(coord).map(|cell| cell.value.as_str())
    }

    /// Calculated cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &CalculatedCell)> {
        self.cells.iter().map(|(c, cell)| (*c, cell))
    }

    /// Number of calculated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether nothing was calculated
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Extension trait for Grid to add calculation methods
pub trait GridCalculationExt {
    /// Calculate every cell with the built-in functions and default options
    fn calculate(&self) -> SheetValues;

    /// Calculate every cell with a custom registry and options
    fn calculate_with(&self, registry: &FunctionRegistry, options: EvaluationOptions)
        -> SheetValues;
}

impl GridCalculationExt for Grid {
    fn calculate(&self) -> SheetValues {
        self.calculate_with(FunctionRegistry::builtin(), EvaluationOptions::default())
    }

    fn calculate_with(
        &self,
        registry: &FunctionRegistry,
        options: EvaluationOptions,
    ) -> SheetValues {
        // One context for the whole pass, so every cell is evaluated at most once
        let ctx = EvaluationContext::new(self, registry, options);
        let mut stats = CalculationStats::default();
        let mut cells = Vec::with_capacity(self.len());

        for (coord, cell) in self.cells() {
            if matches!(classify(&cell.formula), Entry::Formula(_)) {
                stats.formula_count += 1;
            }

            let value = ctx.evaluate_cell(coord);
            stats.cells_calculated += 1;

            match CellError::from_str(&value) {
                Some(CellError::Circular) => {
                    stats.errors += 1;
                    stats.circular_references += 1;
                }
                Some(_) => stats.errors += 1,
                None => {}
            }

            let alignment = if is_numeric_text(&value) && !cell.is_text_escaped() {
                HorizontalAlignment::Right
            } else {
                HorizontalAlignment::Left
            };

            cells.push((
                coord,
                CalculatedCell {
                    value,
                    alignment,
                    style: Style::from_flags(&cell.style),
                },
            ));
        }

        debug!(
            "Calculated {} cells ({} formulas, {} errors, {} circular)",
            stats.cells_calculated, stats.formula_count, stats.errors, stats.circular_references
        );

        SheetValues {
            cells,
            bounds: self.bounds(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyleFlag;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_grid() {
        let values = Grid::new().calculate();
        assert!(values.is_empty());
        assert_eq!(values.stats, CalculationStats::default());
    }

    #[test]
    fn test_alignment() {
        let mut grid = Grid::new();
        grid.set_cell_formula("A1", "42").unwrap();
        grid.set_cell_formula("A2", "'42").unwrap();
        grid.set_cell_formula("A3", "hello").unwrap();
        grid.set_cell_formula("A4", "=A1/2").unwrap();
        grid.set_cell_formula("A5", "=1/0").unwrap();

        let values = grid.calculate();
        let alignment = |address: &str| {
            let coord = Coordinate::parse(address, SheetBounds::default()).unwrap();
            values.get(coord).unwrap().alignment
        };

        assert_eq!(alignment("A1"), HorizontalAlignment::Right);
        assert_eq!(alignment("A2"), HorizontalAlignment::Left);
        assert_eq!(alignment("A3"), HorizontalAlignment::Left);
        assert_eq!(alignment("A4"), HorizontalAlignment::Right);
        assert_eq!(alignment("A5"), HorizontalAlignment::Left);
    }

    #[test]
    fn test_style_passes_through() {
        let mut grid = Grid::new();
        let b2 = Coordinate::new(1, 1);
        grid.set_cell_formula_at(b2, "=1+1").unwrap();
        grid.toggle_cell_style_at(b2, StyleFlag::Bold).unwrap();
        grid.toggle_cell_style_at(b2, StyleFlag::Underline).unwrap();

        let values = grid.calculate();
        let cell = values.get(b2).unwrap();
        assert_eq!(cell.value, "2");
        assert!(cell.style.bold);
        assert!(!cell.style.italic);
        assert!(cell.style.underline);
    }

    #[test]
    fn test_stats() {
        let mut grid = Grid::new();
        grid.set_cell_formula("A1", "=A2").unwrap();
        grid.set_cell_formula("A2", "=A1").unwrap();
        grid.set_cell_formula("B1", "=K999").unwrap();
        grid.set_cell_formula("B2", "7").unwrap();
        grid.set_cell_formula("B3", "=B2*2").unwrap();

        let values = grid.calculate();
        assert_eq!(
            values.stats,
            CalculationStats {
                formula_count: 4,
                cells_calculated: 5,
                errors: 3,
                circular_references: 2,
            }
        );
        assert_eq!(values.value("B1"), Some("#REF!"));
        assert_eq!(values.value("B3"), Some("14"));
        assert_eq!(values.value("C1"), None);
        assert_eq!(values.value("not an address"), None);
    }

    #[test]
    fn test_cells_are_row_major() {
        let mut grid = Grid::new();
        grid.set_cell_formula("B1", "1").unwrap();
        grid.set_cell_formula("A2", "2").unwrap();
        grid.set_cell_formula("A1", "3").unwrap();

        let values = grid.calculate();
        let order: Vec<String> = values.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(order, vec!["A1", "B1", "A2"]);
        assert_eq!(values.len(), 3);
    }
}
