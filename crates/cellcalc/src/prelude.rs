//! Prelude module - common imports for cellcalc users
//!
//! ```rust
//! use cellcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellError,
    CellRange,
    CellStore,
    Coordinate,
    // Error types
    Error,
    // Evaluation
    evaluate,
    EvaluationOptions,
    FunctionRegistry,
    // Main types
    Grid,
    // Extension traits
    GridCalculationExt,
    HorizontalAlignment,
    Result,
    SheetBounds,
    SheetValues,
    Style,
    StyleFlag,
};
