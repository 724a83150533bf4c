use thiserror::Error;

use crate::core::encoding::EncodeError;

/// Failures raised while filling or decoding a card.
///
/// Apart from `OutOfBounds`, `Encode` and `Io`, these only surface in strict mode;
/// the permissive reader treats the same conditions as blank punches.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("row {row}, column {column}: unexpected character '{ch}' (expected 'X' or blank)")]
    UnexpectedChar {
        row: &'static str,
        column: usize,
        ch: char,
    },
    #[error("row {row}: line is {len} columns wide, a card has 80")]
    LineTooLong { row: &'static str, len: usize },
    #[error("input ended after {rows} of 12 card rows")]
    ShortCard { rows: usize },
    #[error("column {column}: {count} punches, at most 2 can be decoded")]
    TooManyPunches { column: usize, count: usize },
    #[error("column {column}: punches map to ({zone}, {digit}), outside the extended BCD table")]
    UnmappedColumn {
        column: usize,
        zone: usize,
        digit: usize,
    },
    #[error("row {row}, column {column} is outside the 12x80 card")]
    OutOfBounds { row: usize, column: usize },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to read card input: {0}")]
    Io(#[from] std::io::Error),
}
