//! Recursive resolution of cell references
//!
//! A referenced cell is evaluated with the same rules as any other entry. The resolver
//! tracks which cells are currently being evaluated so self-references terminate with
//! `#CIRCULAR!`, caps the chain length (`#DEPTH!`), and remembers finished cells for the
//! lifetime of its context when their result does not depend on the evaluation path.

use crate::classify::{classify, Entry};
use crate::evaluator::{EvaluationContext, FormulaValue};
use ahash::AHashMap;
use cellcalc_core::{CellError, Coordinate};
use log::{trace, warn};
use std::cell::RefCell;

/// A resolved cell: what it displays and what formulas referencing it see
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCell {
    pub display: String,
    pub value: FormulaValue,
}

impl ResolvedCell {
    fn error(err: CellError) -> Self {
        Self {
            display: err.as_str().to_string(),
            value: FormulaValue::Error(err),
        }
    }
}

/// A cell being evaluated
#[derive(Debug)]
struct Frame {
    coord: Coordinate,
    /// Lowest stack index a cycle below this frame ran into
    low: usize,
    /// Whether the depth limit was hit below this frame
    depth_hit: bool,
}

impl Frame {
    fn new(coord: Coordinate) -> Self {
        Self {
            coord,
            low: usize::MAX,
            depth_hit: false,
        }
    }
}

pub(crate) struct ReferenceResolver {
    /// Cells currently being evaluated, outermost first
    stack: RefCell<Vec<Frame>>,
    cache: RefCell<AHashMap<Coordinate, ResolvedCell>>,
}

/// Pops the resolution stack when dropped, handing what the frame saw to its parent
struct StackGuard<'r> {
    stack: &'r RefCell<Vec<Frame>>,
    index: usize,
}

impl StackGuard<'_> {
    /// Whether the result of this frame is the same from any entry point
    fn is_path_independent(&self) -> bool {
        self.stack
            .borrow()
            .get(self.index)
            .map_or(false, |frame| !frame.depth_hit && frame.low >= self.index)
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.stack.borrow_mut();
        if let Some(frame) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.low = parent.low.min(frame.low);
                parent.depth_hit |= frame.depth_hit;
            }
        }
    }
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self {
            stack: RefCell::new(Vec::new()),
            cache: RefCell::new(AHashMap::new()),
        }
    }

    pub fn resolve(&self, ctx: &EvaluationContext, coord: Coordinate) -> ResolvedCell {
        let cached = self.cache.borrow().get(&coord).cloned();
        if let Some(resolved) = cached {
            return resolved;
        }

        let guard = match self.enter(coord, ctx.options.max_depth) {
            Ok(guard) => guard,
            Err(err) => {
                match err {
                    CellError::Circular => warn!("Circular reference through {}", coord),
                    _ => warn!(
                        "Reference chain deeper than {} at {}",
                        ctx.options.max_depth, coord
                    ),
                }
                return ResolvedCell::error(err);
            }
        };

        let raw = ctx.store.formula(coord).unwrap_or_default();
        let display = ctx.evaluate(raw);
        let value = match classify(raw) {
            Entry::Text(rest) => FormulaValue::Text(rest.to_string()),
            _ => FormulaValue::from_display(&display),
        };
        trace!("{} = {:?}", coord, display);

        let resolved = ResolvedCell { display, value };

        // A cycle closed by an outer cell, or a depth cut, depends on where evaluation
        // started
        if guard.is_path_independent() {
            self.cache.borrow_mut().insert(coord, resolved.clone());
        }

        resolved
    }

    fn enter(&self, coord: Coordinate, max_depth: usize) -> Result<StackGuard<'_>, CellError> {
        let mut stack = self.stack.borrow_mut();
        if let Some(target) = stack.iter().position(|frame| frame.coord == coord) {
            if let Some(top) = stack.last_mut() {
                top.low = top.low.min(target);
            }
            return Err(CellError::Circular);
        }
        if stack.len() >= max_depth {
            if let Some(top) = stack.last_mut() {
                top.depth_hit = true;
            }
            return Err(CellError::Depth);
        }
        let index = stack.len();
        stack.push(Frame::new(coord));
        Ok(StackGuard {
            stack: &self.stack,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvaluationOptions;
    use crate::functions::FunctionRegistry;
    use cellcalc_core::Grid;
    use pretty_assertions::assert_eq;

    fn context(grid: &Grid, max_depth: usize) -> EvaluationContext<'_> {
        EvaluationContext::new(
            grid,
            FunctionRegistry::builtin(),
            EvaluationOptions { max_depth },
        )
    }

    #[test]
    fn test_stack_unwinds() {
        let mut grid = Grid::new();
        grid.set_cell_formula("A1", "=A2+A3").unwrap();
        grid.set_cell_formula("A2", "=A3").unwrap();
        grid.set_cell_formula("A3", "1").unwrap();

        let ctx = context(&grid, 8);
        let resolved = ctx.resolver.resolve(&ctx, Coordinate::new(0, 0));
        assert_eq!(resolved.display, "2");
        assert!(ctx.resolver.stack.borrow().is_empty());
        assert_eq!(ctx.resolver.cache.borrow().len(), 3);
    }

    #[test]
    fn test_text_escaped_value() {
        let mut grid = Grid::new();
        grid.set_cell_formula("B1", "'42").unwrap();

        let ctx = context(&grid, 8);
        let resolved = ctx.resolver.resolve(&ctx, Coordinate::new(1, 0));
        assert_eq!(resolved.display, "42");
        assert_eq!(resolved.value, FormulaValue::Text("42".into()));
    }

    #[test]
    fn test_depth_results_are_not_cached() {
        let mut grid = Grid::new();
        grid.set_cell_formula("A1", "=A2").unwrap();
        grid.set_cell_formula("A2", "=A3").unwrap();
        grid.set_cell_formula("A3", "=A4").unwrap();

        let ctx = context(&grid, 3);
        let a1 = ctx.resolver.resolve(&ctx, Coordinate::new(0, 0));
        assert_eq!(a1.value, FormulaValue::Error(CellError::Depth));
        assert!(ctx.resolver.stack.borrow().is_empty());
        assert!(ctx.resolver.cache.borrow().is_empty());

        // Started lower down the chain fits in the limit
        let a2 = ctx.resolver.resolve(&ctx, Coordinate::new(0, 1));
        assert_eq!(a2.display, "0");
    }

    #[test]
    fn test_cycle_closing_cell_is_cached() {
        let mut grid = Grid::new();
        grid.set_cell_formula("C1", "=C2").unwrap();
        grid.set_cell_formula("C2", "=C1").unwrap();

        let ctx = context(&grid, 8);
        let c1 = ctx.resolver.resolve(&ctx, Coordinate::new(2, 0));
        assert_eq!(c1.display, "#CIRCULAR!");
        assert!(ctx.resolver.stack.borrow().is_empty());

        // C2 only saw the cycle because C1 was already on the stack
        let cache = ctx.resolver.cache.borrow();
        assert!(cache.contains_key(&Coordinate::new(2, 0)));
        assert!(!cache.contains_key(&Coordinate::new(2, 1)));
    }

    #[test]
    fn test_results_do_not_depend_on_entry_point() {
        let mut grid = Grid::new();
        grid.set_cell_formula("A2", "=B1").unwrap();
        grid.set_cell_formula("B1", "=1/0+A2").unwrap();

        // B1 first, as a row-major pass would
        let ctx = context(&grid, 8);
        let b1 = ctx.resolver.resolve(&ctx, Coordinate::new(1, 0));
        assert_eq!(b1.display, "#DIV0!");
        let a2 = ctx.resolver.resolve(&ctx, Coordinate::new(0, 1));
        assert_eq!(a2.display, "#DIV0!");

        let fresh = context(&grid, 8);
        let a2 = fresh.resolver.resolve(&fresh, Coordinate::new(0, 1));
        assert_eq!(a2.display, "#DIV0!");
    }
}
