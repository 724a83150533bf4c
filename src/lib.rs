//! Reads 80-column punch cards in a plain-text form and decodes them with the
//! extended BCD table.
//!
//! A card is twelve lines of `X` (punched) and blanks, top row first. Cards are
//! separated by one line, and a card whose first column is punched in every row
//! ends the deck.

pub mod core;
pub mod graphics;

pub use crate::core::{
    COLS, Card, CardError, CardReader, CardSummary, ColumnMask, DecodedCard, DeckReport,
    EXTENDED_BCD, EncodeError, ExtendedBcd, Fill, PUNCH, PunchEncoding, ROWS, ReaderOptions,
    RenderStyle, Termination, decode_deck, digest_lines, encode_deck,
};
pub use crate::graphics::{CardImageStyle, ImageRenderOptions, MAX_DPI, MIN_DPI, render_card_image};

use std::io::{BufRead, Write};

/// Decode every card from `input`, writing one line per card to `output`.
///
/// Returns the number of cards written.
pub fn decode_stream<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    options: ReaderOptions,
) -> Result<usize, CardError> {
    let mut written = 0;
    for card in CardReader::with_options(input, options) {
        let card = card?;
        output.write_all(card.line().as_bytes())?;
        written += 1;
    }
    output.flush()?;
    Ok(written)
}
