//! FILENAME: engine/src/error.rs
//! PURPOSE: Structural errors raised by the sheet. These abort the
//! operation with no visible state change — distinct from
//! formula-evaluation errors, which are first-class `Value`s (see value.rs).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    /// `pos` fell outside `[0, MAX_ROWS) x [0, MAX_COLS)`.
    #[error("position is out of range")]
    InvalidPosition,

    /// The formula parser rejected the expression.
    #[error("formula error: {0}")]
    FormulaException(String),

    /// Committing the candidate formula would close a cycle back to the
    /// cell being written.
    #[error("circular dependency detected")]
    CircularDependency,
}
