use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::card::Card;
use crate::core::encoding::ROWS;
use crate::core::error::CardError;

/// Knobs for reading a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Reject malformed rows and undecodable columns instead of reading them as blank.
    #[serde(default)]
    pub strict: bool,
}

/// Outcome of filling one card from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Card rows taken from the input; the rest were left blank.
    pub rows: usize,
    /// Whether the separator line after the card was consumed.
    pub separator: bool,
}

impl Fill {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn is_complete(&self) -> bool {
        self.rows == ROWS
    }
}

/// One card as read from the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCard {
    /// 1-based position in the deck.
    pub index: usize,
    /// The 80 decoded characters, without a line terminator.
    pub text: String,
    pub sentinel: bool,
    pub rows_read: usize,
    pub card: Card,
}

impl DecodedCard {
    /// Decoded text with its line terminator, as printed by the reader.
    pub fn line(&self) -> String {
        format!("{}\n", self.text)
    }
}

/// Reads cards in the text format: twelve lines per card, `X` for a punch,
/// one separator line after every card except the last one.
pub struct CardReader<R> {
    input: R,
    options: ReaderOptions,
    line: Vec<u8>,
    cards_read: usize,
    done: bool,
}

impl<R: BufRead> CardReader<R> {
    pub fn new(input: R) -> Self {
        Self::with_options(input, ReaderOptions::default())
    }

    pub fn with_options(input: R, options: ReaderOptions) -> Self {
        Self {
            input,
            options,
            line: Vec::new(),
            cards_read: 0,
            done: false,
        }
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    pub fn cards_read(&self) -> usize {
        self.cards_read
    }

    /// Fill `card` with the next twelve rows of input.
    ///
    /// Rows missing at the end of the stream are left blank; nothing is
    /// touched when the stream is already exhausted. After a complete card
    /// that is not the last one, the separator line is consumed as well.
    pub fn read_card(&mut self, card: &mut Card) -> Result<Fill, CardError> {
        let strict = self.options.strict;
        let mut rows = 0;
        while rows < ROWS && self.next_line()? {
            if strict {
                card.fill_row(rows, &String::from_utf8_lossy(&self.line), true)?;
            } else {
                card.fill_row_bytes(rows, &self.line)?;
            }
            rows += 1;
        }
        if rows == 0 {
            return Ok(Fill {
                rows,
                separator: false,
            });
        }
        if rows < ROWS {
            if strict {
                return Err(CardError::ShortCard { rows });
            }
            warn!(rows, "input ended inside a card, remaining rows left blank");
            for row in rows..ROWS {
                card.fill_row_bytes(row, &[])?;
            }
            return Ok(Fill {
                rows,
                separator: false,
            });
        }
        let separator = !card.is_last_card() && self.next_line()?;
        Ok(Fill { rows, separator })
    }

    /// Read and decode the next card, or `None` once the deck is over.
    pub fn next_card(&mut self) -> Result<Option<DecodedCard>, CardError> {
        if self.done {
            return Ok(None);
        }
        let mut card = Card::new();
        let fill = match self.read_card(&mut card) {
            Ok(fill) => fill,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };
        if fill.is_empty() {
            debug!(cards = self.cards_read, "end of input");
            self.done = true;
            return Ok(None);
        }
        let mut text = if self.options.strict {
            match card.decode_strict() {
                Ok(text) => text,
                Err(err) => {
                    self.done = true;
                    return Err(err);
                }
            }
        } else {
            card.decode()
        };
        text.pop();

        self.cards_read += 1;
        let sentinel = card.is_last_card();
        if sentinel {
            debug!(card = self.cards_read, "last card reached");
        }
        if sentinel || !fill.is_complete() {
            self.done = true;
        }
        Ok(Some(DecodedCard {
            index: self.cards_read,
            text,
            sentinel,
            rows_read: fill.rows,
            card,
        }))
    }

    fn next_line(&mut self) -> Result<bool, CardError> {
        self.line.clear();
        if self.input.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        if self.line.ends_with(b"\n") {
            self.line.pop();
            if self.line.ends_with(b"\r") {
                self.line.pop();
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for CardReader<R> {
    type Item = Result<DecodedCard, CardError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_card().transpose()
    }
}
