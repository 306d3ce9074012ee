//! FILENAME: engine/src/position.rs
//! PURPOSE: A1-notation address codec and grid bounds.
//! CONTEXT: Positions are the key type for every map in the engine (cells,
//! dependents). Zero-based internally, A1 notation at the boundary.

use std::fmt;

/// Number of rows a sheet may address (0-based rows `0..MAX_ROWS`).
pub const MAX_ROWS: i32 = 16384;
/// Number of columns a sheet may address (0-based cols `0..MAX_COLS`).
pub const MAX_COLS: i32 = 16384;

/// Size of the column letter alphabet (`A`..`Z`).
pub const LETTERS: u32 = 26;
/// Longest accepted A1 address string, e.g. `"XFD16384"`.
pub const MAX_POSITION_LENGTH: usize = 17;
/// Longest accepted run of leading column letters.
pub const MAX_POS_LETTER_COUNT: usize = 3;

/// Marks a formula: a leading `=` followed by at least one more character.
pub const FORMULA_SIGN: char = '=';
/// Marks a literal that would otherwise be read as a formula: a leading `'`.
pub const ESCAPE_SIGN: char = '\'';

/// A cell address, zero-based internally (`row`, `col`).
///
/// Ordered lexicographically: row first, then column. [`Position::NONE`] is
/// the sentinel returned by [`Position::from_string`] on any parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

/// A rectangular extent anchored at `(0, 0)`, in rows x columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Position {
    /// Sentinel for "no position" / parse failure.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// True iff both coordinates are non-negative and within the grid bounds.
    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.row < MAX_ROWS && self.col >= 0 && self.col < MAX_COLS
    }

    /// Renders the A1-notation address. Empty string for invalid positions,
    /// including [`Position::NONE`].
    pub fn to_string(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        format!("{}{}", col_to_letters(self.col as u32), self.row + 1)
    }

    /// Parses an A1-notation address: one or more uppercase letters followed
    /// by one or more decimal digits and nothing else. Any deviation —
    /// lowercase, empty letters or digits, trailing junk, an out-of-range
    /// result — yields [`Position::NONE`].
    pub fn from_string(s: &str) -> Position {
        if s.is_empty() || s.len() > MAX_POSITION_LENGTH {
            return Position::NONE;
        }

        let letters_end = s
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(s.len());

        if letters_end == 0 || letters_end == s.len() || letters_end > MAX_POS_LETTER_COUNT {
            return Position::NONE;
        }

        let (letters, digits) = s.split_at(letters_end);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Position::NONE;
        }

        let col = match letters_to_col(letters) {
            Some(c) => c,
            None => return Position::NONE,
        };
        let row_num: u64 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return Position::NONE,
        };
        if row_num == 0 {
            return Position::NONE;
        }

        let row = (row_num - 1) as i64;
        if row > i64::from(i32::MAX) || col > u64::from(u32::MAX) {
            return Position::NONE;
        }

        let result = Position::new(row as i32, col as i32);
        if result.is_valid() {
            result
        } else {
            Position::NONE
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl Size {
    pub fn new(rows: i32, cols: i32) -> Self {
        Size { rows, cols }
    }
}

/// Converts a 0-based column index to its bijective-base-26 letters.
/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`.
fn col_to_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % LETTERS) as u8);
        if col < LETTERS {
            break;
        }
        col = col / LETTERS - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters are valid UTF-8")
}

/// Converts bijective-base-26 uppercase letters to a 0-based column index.
/// Returns `None` on overflow (guards absurdly long letter runs, though
/// [`MAX_POS_LETTER_COUNT`] already bounds that in practice).
fn letters_to_col(letters: &str) -> Option<u64> {
    let mut result: u64 = 0;
    for b in letters.bytes() {
        let digit = u64::from(b - b'A' + 1);
        result = result.checked_mul(u64::from(LETTERS))?.checked_add(digit)?;
    }
    result.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_examples() {
        for (row, col, text) in [
            (0, 0, "A1"),
            (0, 1, "B1"),
            (99, 26, "AA100"),
            (49, 25, "Z50"),
        ] {
            let p = Position::new(row, col);
            assert_eq!(p.to_string(), text);
            assert_eq!(Position::from_string(text), p);
        }
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "1A", "A", "1", "a1", "A1A", "A-1", "A1 ", " A1", "A0", "AAAA1"] {
            assert_eq!(Position::from_string(bad), Position::NONE, "input: {bad:?}");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        // Column letters alone resolve past MAX_COLS for a 3-letter run this large.
        assert_eq!(Position::from_string("ZZZ1"), Position::NONE);
        assert_eq!(Position::from_string("A99999999999999999999"), Position::NONE);
    }

    #[test]
    fn none_is_invalid_and_prints_empty() {
        assert!(!Position::NONE.is_valid());
        assert_eq!(Position::NONE.to_string(), "");
    }

    #[test]
    fn ordering_is_row_then_col() {
        let a1 = Position::new(0, 0);
        let b1 = Position::new(0, 1);
        let a2 = Position::new(1, 0);
        assert!(a1 < b1);
        assert!(b1 < a2);
    }

    proptest::proptest! {
        #[test]
        fn roundtrip_any_valid_position(row in 0i32..MAX_ROWS, col in 0i32..MAX_COLS) {
            let p = Position::new(row, col);
            proptest::prop_assert_eq!(Position::from_string(&p.to_string()), p);
        }

        #[test]
        fn rejects_anything_off_grammar(s in "[a-zA-Z0-9]{0,10}") {
            let parsed = Position::from_string(&s);
            if parsed != Position::NONE {
                // If it parsed, it must have been LETTERS+DIGITS and round-trip.
                proptest::prop_assert_eq!(Position::from_string(&parsed.to_string()), parsed);
            }
        }
    }
}
