//! Cell styling
//!
//! Styling is stored per cell as a short flag string (`B`, `I`, `U` in any case and
//! order). It never influences evaluation; the engine only passes it through.

use crate::error::{Error, Result};

/// A single style flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
}

impl StyleFlag {
    /// Upper-case letter used in flag strings
    pub fn letter(&self) -> char {
        match self {
            StyleFlag::Bold => 'B',
            StyleFlag::Italic => 'I',
            StyleFlag::Underline => 'U',
        }
    }

    /// Look up a flag by its letter (case-insensitive)
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'B' => Ok(StyleFlag::Bold),
            'I' => Ok(StyleFlag::Italic),
            'U' => Ok(StyleFlag::Underline),
            _ => Err(Error::InvalidStyleFlag(c)),
        }
    }
}

/// Decoded style flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    /// Decode a flag string; unknown characters are ignored
    pub fn from_flags(flags: &str) -> Self {
        let has = |flag: StyleFlag| {
            flags
                .chars()
                .any(|c| c.to_ascii_uppercase() == flag.letter())
        };
        Self {
            bold: has(StyleFlag::Bold),
            italic: has(StyleFlag::Italic),
            underline: has(StyleFlag::Underline),
        }
    }

    /// Canonical flag string, e.g. "BU"
    pub fn to_flags(&self) -> String {
        [
            (self.bold, StyleFlag::Bold),
            (self.italic, StyleFlag::Italic),
            (self.underline, StyleFlag::Underline),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, flag)| flag.letter())
        .collect()
    }

    /// Check whether a flag is set
    pub fn has(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }
}

/// Toggle one flag in a raw flag string
///
/// If the flag is present (in either case) every occurrence is removed, otherwise it
/// is appended in upper case. Other characters are left alone.
pub fn toggle_style_flags(styling: &str, flag: StyleFlag) -> String {
    let letter = flag.letter();
    let present = styling.chars().any(|c| c.to_ascii_uppercase() == letter);

    if present {
        styling
            .chars()
            .filter(|c| c.to_ascii_uppercase() != letter)
            .collect()
    } else {
        let mut toggled = styling.to_string();
        toggled.push(letter);
        toggled
    }
}

/// Horizontal alignment hint for a displayed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// Text and escaped entries
    #[default]
    Left,
    /// Numbers
    Right,
}
