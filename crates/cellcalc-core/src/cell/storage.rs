//! Per-cell storage

/// Raw contents of one grid cell
///
/// `formula` is exactly what the user entered (literal text, a number or a formula);
/// `style` is an independent flag string (see [`crate::Style`]). An empty cell has
/// both fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Raw user entry
    pub formula: String,
    /// Style flag string, e.g. "BU"
    pub style: String,
}

impl Cell {
    /// Create a cell holding a raw entry and no styling
    pub fn new<S: Into<String>>(formula: S) -> Self {
        Self {
            formula: formula.into(),
            style: String::new(),
        }
    }

    /// Check if the cell holds neither an entry nor styling
    pub fn is_empty(&self) -> bool {
        self.formula.is_empty() && self.style.is_empty()
    }

    /// Check if the raw entry starts with a text-escape apostrophe
    pub fn is_text_escaped(&self) -> bool {
        self.formula.starts_with('\'')
    }
}
