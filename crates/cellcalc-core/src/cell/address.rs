//! Cell coordinates, address text and ranges

use crate::error::{Error, Result};
use lazy_regex::regex_is_match;
use std::fmt;

/// Default number of columns in a grid (A..ZZ)
pub const DEFAULT_COLUMNS: u16 = 702;

/// Default number of rows in a grid
pub const DEFAULT_ROWS: u32 = 702;

/// Widest grid that can still be addressed with two column letters
pub const MAX_ADDRESSABLE_COLUMNS: u16 = 702;

/// Tallest grid that can still be addressed with three row digits
pub const MAX_ADDRESSABLE_ROWS: u32 = 999;

/// Test whether `text` has the shape of a cell address: 1-2 letters followed by 1-3 digits.
///
/// Letters are matched case-insensitively. The check is purely lexical, it does not
/// look at any grid bounds.
pub fn is_valid_address_text(text: &str) -> bool {
    regex_is_match!(r"^[A-Za-z]{1,2}[0-9]{1,3}$", text)
}

/// Dimensions of a grid
///
/// Every coordinate handed to or produced by the engine lives in
/// `[0, columns - 1] x [0, rows - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BoundsRepr", into = "BoundsRepr")
)]
pub struct SheetBounds {
    columns: u16,
    rows: u32,
}

impl SheetBounds {
    /// Create bounds for a `columns x rows` grid
    ///
    /// Both axes must be non-empty and addressable: at most 702 columns (`ZZ`) and at
    /// most 999 rows.
    pub fn new(columns: u16, rows: u32) -> Result<Self> {
        let reason = if columns == 0 || rows == 0 {
            Some("grid must have at least one column and one row")
        } else if columns > MAX_ADDRESSABLE_COLUMNS {
            Some("columns beyond ZZ cannot be addressed")
        } else if rows > MAX_ADDRESSABLE_ROWS {
            Some("rows beyond 999 cannot be addressed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidBounds {
                columns,
                rows,
                reason,
            }),
            None => Ok(Self { columns, rows }),
        }
    }

    /// Number of columns
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Index of the last column
    pub fn last_column(&self) -> u16 {
        self.columns - 1
    }

    /// Index of the last row
    pub fn last_row(&self) -> u32 {
        self.rows - 1
    }

    /// Check whether a coordinate lies inside the grid
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.col < self.columns && coord.row < self.rows
    }

    /// Clamp a coordinate onto the grid
    pub fn clamp(&self, coord: Coordinate) -> Coordinate {
        Coordinate::new(
            coord.col.min(self.last_column()),
            coord.row.min(self.last_row()),
        )
    }
}

impl Default for SheetBounds {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BoundsRepr {
    columns: u16,
    rows: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<BoundsRepr> for SheetBounds {
    type Error = Error;

    fn try_from(repr: BoundsRepr) -> Result<Self> {
        SheetBounds::new(repr.columns, repr.rows)
    }
}

#[cfg(feature = "serde")]
impl From<SheetBounds> for BoundsRepr {
    fn from(bounds: SheetBounds) -> Self {
        BoundsRepr {
            columns: bounds.columns,
            rows: bounds.rows,
        }
    }
}

/// A zero-based `(column, row)` position in the grid
///
/// Ordering is row-major: all cells of row 0 sort before row 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., ZZ=701)
    pub col: u16,
}

impl Coordinate {
    /// Create a coordinate from a column and a row index
    pub fn new(col: u16, row: u32) -> Self {
        Self { row, col }
    }

    /// Parse an address leniently, clamping onto the grid instead of failing
    ///
    /// The leading run of letters is read as a base-26 column (`A` = 1, stored
    /// zero-based) and the trailing run of digits as a 1-based row. Missing letters
    /// give column 0, missing digits and a literal `0` give row 0.
    ///
    /// # Examples
    /// ```
    /// use cellcalc_core::{Coordinate, SheetBounds};
    ///
    /// let bounds = SheetBounds::default();
    /// assert_eq!(Coordinate::parse_clamped("bL47", bounds), Coordinate::new(63, 46));
    /// assert_eq!(Coordinate::parse_clamped("C0", bounds), Coordinate::new(2, 0));
    /// assert_eq!(Coordinate::parse_clamped("AAA29", bounds), Coordinate::new(701, 28));
    /// ```
    pub fn parse_clamped(text: &str, bounds: SheetBounds) -> Self {
        let text = text.trim().to_ascii_uppercase();

        let letters_end = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let letters = &text[..letters_end];
        let digits_start = text
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .len();
        let digits = &text[digits_start.max(letters_end)..];

        let col = letters
            .bytes()
            .fold(0u64, |acc, b| {
                acc.saturating_mul(26)
                    .saturating_add(u64::from(b - b'A' + 1))
            })
            .saturating_sub(1)
            .min(u64::from(bounds.last_column()));

        let row = if digits.is_empty() {
            0
        } else {
            // The run is all digits, so a failed parse can only mean overflow.
            digits.parse::<u64>().unwrap_or(u64::MAX).saturating_sub(1)
        }
        .min(u64::from(bounds.last_row()));

        Self::new(col as u16, row as u32)
    }

    /// Parse an address strictly
    ///
    /// The text must look like an address (see [`is_valid_address_text`]), name a row
    /// of at least 1 and fall inside `bounds`.
    pub fn parse(text: &str, bounds: SheetBounds) -> Result<Self> {
        let text = text.trim();
        if !is_valid_address_text(text) {
            return Err(Error::InvalidAddress(format!("'{}'", text)));
        }

        let split = text
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(text.len());
        let col = Self::letters_to_column(&text[..split])?;
        let row: u32 = text[split..]
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", text)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                text
            )));
        }

        let row = row - 1;

        if row >= bounds.rows() {
            return Err(Error::RowOutOfBounds(row, bounds.last_row()));
        }

        if col >= bounds.columns() {
            return Err(Error::ColumnOutOfBounds(col, bounds.last_column()));
        }

        Ok(Self::new(col, row))
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
                .ok_or_else(|| Error::InvalidAddress(format!("column too large: {}", letters)))?;
        }

        u16::try_from(col - 1)
            .map_err(|_| Error::InvalidAddress(format!("column too large: {}", letters)))
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }

    /// Format as A1-style string, clamping onto the grid first
    ///
    /// Out-of-range coordinates become the last representable address instead of an
    /// error, e.g. column 1037 renders as `ZZ` on the default grid.
    pub fn to_a1_string_in(&self, bounds: SheetBounds) -> String {
        bounds.clamp(*self).to_a1_string()
    }

    /// Create a range from this coordinate to another
    pub fn to(&self, other: Coordinate) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// A rectangular block of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start coordinate (top-left)
    pub start: Coordinate,
    /// End coordinate (bottom-right)
    pub end: Coordinate,
}

impl CellRange {
    /// Create a new cell range
    ///
    /// Corner order is irrelevant: the range is normalised so `start` is top-left and
    /// `end` is bottom-right.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            start: Coordinate::new(a.col.min(b.col), a.row.min(b.row)),
            end: Coordinate::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// Create a single-cell range
    pub fn single(coord: Coordinate) -> Self {
        Self {
            start: coord,
            end: coord,
        }
    }

    /// Parse a range from `A1:B10` notation, strictly
    pub fn parse(s: &str, bounds: SheetBounds) -> Result<Self> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once(':') {
            let start = Coordinate::parse(start, bounds)?;
            let end = Coordinate::parse(end, bounds)?;
            Ok(Self::new(start, end))
        } else {
            // Single cell range
            let coord = Coordinate::parse(s, bounds)?;
            Ok(Self::single(coord))
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row >= self.start.row
            && coord.row <= self.end.row
            && coord.col >= self.start.col
            && coord.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Iterate over all coordinates in the range (row by row, column fastest)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u16,
}

impl CellRangeIterator {
    fn remaining(&self) -> usize {
        if self.current_row > self.range.end.row {
            return 0;
        }
        let full_rows = (self.range.end.row - self.current_row) as usize;
        let in_row = (self.range.end.col - self.current_col) as usize + 1;
        full_rows * self.range.col_count() as usize + in_row
    }
}

impl Iterator for CellRangeIterator {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row {
            return None;
        }

        let coord = Coordinate::new(self.current_col, self.current_row);

        // Move to next cell
        if self.current_col >= self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.current_col += 1;
        }

        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}
