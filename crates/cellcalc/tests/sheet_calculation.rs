//! Tests for whole-sheet recalculation

use cellcalc::prelude::*;
use cellcalc::{CalculationStats, EvaluationContext, EvaluationOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_recalculate_after_edit() {
    let mut grid = Grid::new();
    grid.set_cell_formula("A1", "10").unwrap();
    grid.set_cell_formula("A2", "=A1*3").unwrap();
    grid.set_cell_formula("A3", "=SUM(A1:A2)").unwrap();

    let before = grid.calculate();
    assert_eq!(before.value("A3"), Some("40"));

    grid.set_cell_formula("A1", "5").unwrap();
    let after = grid.calculate();
    assert_eq!(after.value("A2"), Some("15"));
    assert_eq!(after.value("A3"), Some("20"));

    grid.clear_cell("A1").unwrap();
    let cleared = grid.calculate();
    assert_eq!(cleared.value("A1"), None);
    assert_eq!(cleared.value("A3"), Some("0"));
}

#[test]
fn test_stats_count_every_error_kind() {
    let mut grid = Grid::new();
    grid.set_cell_formula("A1", "=1/0").unwrap();
    grid.set_cell_formula("A2", "=ZZ999").unwrap();
    grid.set_cell_formula("A3", "=1+abc").unwrap();
    grid.set_cell_formula("A4", "=A4").unwrap();
    grid.set_cell_formula("A5", "'#REF!").unwrap();
    grid.set_cell_formula("A6", "plain").unwrap();

    let values = grid.calculate();
    assert_eq!(
        values.stats,
        CalculationStats {
            formula_count: 4,
            cells_calculated: 6,
            errors: 5,
            circular_references: 1,
        }
    );
}

#[test]
fn test_style_only_cells_are_calculated() {
    let mut grid = Grid::new();
    grid.set_cell_style("C3", "BI").unwrap();

    let values = grid.calculate();
    assert_eq!(values.len(), 1);

    let (coord, cell) = values.iter().next().unwrap();
    assert_eq!(coord.to_string(), "C3");
    assert_eq!(cell.value, "");
    assert_eq!(cell.alignment, HorizontalAlignment::Left);
    assert_eq!(
        cell.style,
        Style {
            bold: true,
            italic: true,
            underline: false,
        }
    );
}

#[test]
fn test_calculate_with_options() {
    let mut grid = Grid::new();
    for row in 1..=10 {
        grid.set_cell_formula(&format!("A{}", row), &format!("=A{}+1", row + 1))
            .unwrap();
    }

    let values = grid.calculate_with(
        FunctionRegistry::builtin(),
        EvaluationOptions { max_depth: 4 },
    );

    // Cells near the end of the chain fit within the limit
    assert_eq!(values.value("A10"), Some("1"));
    assert_eq!(values.value("A8"), Some("3"));
    assert_eq!(values.value("A1"), Some("#DEPTH!"));
    assert_eq!(values.stats.circular_references, 0);
}

#[test]
fn test_calculate_matches_single_cell_evaluation() {
    let mut grid = Grid::new();
    grid.set_cell_formula("A2", "=B1").unwrap();
    grid.set_cell_formula("B1", "=1/0+A2").unwrap();
    grid.set_cell_formula("C1", "=SUM(C2:C3)").unwrap();
    grid.set_cell_formula("C2", "=C3+1").unwrap();
    grid.set_cell_formula("C3", "=C1").unwrap();
    grid.set_cell_formula("D1", "=A2+C2").unwrap();
    grid.set_cell_formula("D2", "=D1*2").unwrap();

    let values = grid.calculate();
    assert_eq!(values.value("A2"), Some("#DIV0!"));

    for (coord, cell) in values.iter() {
        let ctx = EvaluationContext::new(
            &grid,
            FunctionRegistry::builtin(),
            EvaluationOptions::default(),
        );
        assert_eq!(cell.value, ctx.evaluate_cell(coord), "cell {}", coord);
    }
}
