//! Cell addresses.
//!
//! Sheets are addressed the way the remote store addresses them: rows and
//! columns both start at 1 and row 1 is the header row. `CellRef` converts
//! between that pair and A1 notation (`"B3"` is row 3, column 2).
//!
//! # Examples
//!
//! ```
//! use sheetrow_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static A1_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("A1 pattern is valid")
});

/// A reference to a cell by row and column (both 1-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from A1 notation (e.g., "A1", "B2", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = A1_PATTERN.captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col = col.checked_mul(26)?.checked_add(digit)?;
        }

        let row = numbers.parse::<usize>().ok()?;
        if row == 0 {
            return None;
        }

        Some(CellRef::new(row, col))
    }

    /// Convert a 1-indexed column to letters (1 -> A, 26 -> Z, 27 -> AA).
    /// Column 0 has no letters and yields an empty string.
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row)
    }
}
