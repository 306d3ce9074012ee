//! FILENAME: engine/src/cell.rs
//! PURPOSE: The tagged-variant cell content model plus its memoized value.
//! CONTEXT: A cell is empty, plain text, or a formula. Only the formula
//! variant carries a cache; the cache is a field on the cell, not a
//! separate side table, so invalidation is just clearing one `RefCell`.

use std::cell::RefCell;

use crate::formula::{Formula, SheetView};
use crate::position::{ESCAPE_SIGN, FORMULA_SIGN};
use crate::value::Value;

/// The tagged content of a cell. Dispatch is by pattern match, not a class
/// hierarchy — idiomatic for a fixed, closed set of three variants.
pub enum CellContent {
    Empty,
    Text(String),
    Formula(Box<dyn Formula>),
}

impl std::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellContent::Empty => write!(f, "Empty"),
            CellContent::Text(s) => write!(f, "Text({s:?})"),
            CellContent::Formula(formula) => write!(f, "Formula({formula:?})"),
        }
    }
}

/// A single spreadsheet cell: its content plus, for formulas, a single-slot
/// memoized value.
///
/// `get_value` needs a [`SheetView`] to evaluate a formula cell against: a
/// `Cell` here does not hold a back-reference to its owning sheet (Rust
/// ownership won't allow a cell stored inside the sheet's map to also borrow
/// the sheet), so the caller supplies the view. `Sheet::get_value` is the
/// ergonomic entry point that does this for you.
#[derive(Debug)]
pub struct Cell {
    content: CellContent,
    cache: RefCell<Option<Value>>,
}

impl Cell {
    pub fn new_empty() -> Self {
        Cell {
            content: CellContent::Empty,
            cache: RefCell::new(None),
        }
    }

    pub fn new_text(s: String) -> Self {
        debug_assert!(!s.is_empty(), "empty text must route through ClearCell");
        Cell {
            content: CellContent::Text(s),
            cache: RefCell::new(None),
        }
    }

    pub fn new_formula(formula: Box<dyn Formula>) -> Self {
        Cell {
            content: CellContent::Formula(formula),
            cache: RefCell::new(None),
        }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// The cell's value: evaluated (and memoized) for formulas, derived
    /// directly from content for empty/text cells.
    pub fn get_value(&self, view: &dyn SheetView) -> Value {
        match &self.content {
            CellContent::Empty => Value::Text(String::new()),
            CellContent::Text(s) => Value::Text(text_value(s)),
            CellContent::Formula(formula) => {
                if let Some(cached) = self.cache.borrow().as_ref() {
                    return cached.clone();
                }
                let computed = formula.evaluate(view);
                *self.cache.borrow_mut() = Some(computed.clone());
                computed
            }
        }
    }

    /// The cell's text: a pure function of content, independent
    /// of any cached evaluation result.
    pub fn get_text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(formula) => format!("{FORMULA_SIGN}{}", formula.canonical_expression()),
        }
    }

    /// The positions this cell's formula reads, ascending and deduped.
    /// Empty for non-formula cells.
    pub fn referenced_cells(&self) -> Vec<crate::position::Position> {
        match &self.content {
            CellContent::Formula(formula) => formula.referenced_cells(),
            _ => Vec::new(),
        }
    }

    /// Clears the memoized formula result. A no-op for empty/text cells —
    /// they have nothing to clear.
    pub fn invalidate(&self) {
        *self.cache.borrow_mut() = None;
    }

    /// The current memo slot, without forcing evaluation. `pub(crate)`: only
    /// test code elsewhere in this crate needs to observe cache state
    /// directly rather than through `get_value`.
    pub(crate) fn peek_cache(&self) -> Option<Value> {
        self.cache.borrow().clone()
    }
}

/// Applies the escape-sign rule: a leading `'` is stripped from the value
/// (but not the text) so a user can force a would-be formula to render as
/// literal text.
fn text_value(s: &str) -> String {
    if s.starts_with(ESCAPE_SIGN) {
        s[ESCAPE_SIGN.len_utf8()..].to_string()
    } else {
        s.to_string()
    }
}
