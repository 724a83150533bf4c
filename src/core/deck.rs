use std::io::BufRead;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::card::Card;
use crate::core::encoding::{COLS, EncodeError, PunchEncoding};
use crate::core::error::CardError;
use crate::core::reader::{CardReader, DecodedCard, ReaderOptions};

/// Why reading a deck stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The last card (first column fully punched) was read.
    Sentinel,
    /// The input ran out before a last card showed up.
    EndOfInput,
}

/// Per-card entry of a [`DeckReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardSummary {
    pub index: usize,
    pub text: String,
    pub sentinel: bool,
    pub rows_read: usize,
}

impl From<&DecodedCard> for CardSummary {
    fn from(card: &DecodedCard) -> Self {
        Self {
            index: card.index,
            text: card.text.clone(),
            sentinel: card.sentinel,
            rows_read: card.rows_read,
        }
    }
}

/// Everything decoded from one deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckReport {
    pub decoded_at: DateTime<Utc>,
    pub strict: bool,
    pub cards: Vec<CardSummary>,
    pub terminated_by: Termination,
    /// SHA-256 over the decoded lines, terminators included.
    pub digest: String,
}

impl DeckReport {
    /// The decoded deck exactly as the reader prints it.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.cards.len() * (COLS + 1));
        for card in &self.cards {
            out.push_str(&card.text);
            out.push('\n');
        }
        out
    }
}

/// Read every card from `input` and collect the decoded lines.
pub fn decode_deck<R: BufRead>(input: R, options: ReaderOptions) -> Result<DeckReport, CardError> {
    let mut cards = Vec::new();
    let mut terminated_by = Termination::EndOfInput;
    for card in CardReader::with_options(input, options) {
        let card = card?;
        debug!(card = card.index, sentinel = card.sentinel, "decoded card");
        if card.sentinel {
            terminated_by = Termination::Sentinel;
        }
        cards.push(CardSummary::from(&card));
    }
    let digest = digest_lines(cards.iter().map(|card| card.text.as_str()));
    info!(cards = cards.len(), ?terminated_by, "deck decoded");
    Ok(DeckReport {
        decoded_at: Utc::now(),
        strict: options.strict,
        cards,
        terminated_by,
        digest,
    })
}

/// Hex SHA-256 over `lines`, each followed by a newline.
pub fn digest_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();
    format!("{digest:02x}")
}

/// Punch `text` into a deck in the reader's text format.
///
/// Every input line becomes one card; lines longer than 80 characters spill
/// onto further cards. With `last_card` set, the first column of the final card
/// is punched through so readers stop there; whatever it held is lost.
pub fn encode_deck<E: PunchEncoding + ?Sized>(
    enc: &E,
    text: &str,
    last_card: bool,
) -> Result<String, EncodeError> {
    let mut cards = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            cards.push(Card::new());
            continue;
        }
        for chunk in chars.chunks(COLS) {
            let chunk: String = chunk.iter().collect();
            cards.push(Card::from_text(enc, &chunk)?);
        }
    }
    if cards.is_empty() {
        cards.push(Card::new());
    }
    if last_card {
        if let Some(card) = cards.last_mut() {
            if card.column(0).is_some_and(|mask| mask.count() > 0) {
                debug!("first column of the last card overwritten");
            }
            card.mark_last();
        }
    }

    let mut out = String::new();
    for (idx, card) in cards.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        for row in card.to_rows() {
            out.push_str(&row);
            out.push('\n');
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoding::ExtendedBcd;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn encoded_deck_decodes_back() {
        let deck = encode_deck(&ExtendedBcd, "HELLO\n WORLD", true).unwrap();
        let report = decode_deck(Cursor::new(deck), ReaderOptions::default()).unwrap();
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.terminated_by, Termination::Sentinel);
        assert_eq!(report.cards[0].text.trim_end(), "HELLO");
        assert_eq!(report.cards[1].text.trim_end(), " WORLD");
        assert!(report.cards[1].sentinel);
    }

    #[test]
    fn deck_without_last_card_ends_at_input() {
        let deck = encode_deck(&ExtendedBcd, "A\nB\nC", false).unwrap();
        let report = decode_deck(Cursor::new(deck), ReaderOptions { strict: true }).unwrap();
        assert_eq!(report.terminated_by, Termination::EndOfInput);
        assert_eq!(report.cards.len(), 3);
        assert!(report.strict);
    }

    #[test]
    fn long_lines_spill_onto_more_cards() {
        let text = "A".repeat(85);
        let deck = encode_deck(&ExtendedBcd, &text, false).unwrap();
        let report = decode_deck(Cursor::new(deck), ReaderOptions::default()).unwrap();
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.cards[0].text, "A".repeat(80));
        assert_eq!(report.cards[1].text, format!("{:<80}", "AAAAA"));
    }

    #[test]
    fn unsupported_characters_fail_encoding() {
        assert_eq!(
            encode_deck(&ExtendedBcd, "A.B", false),
            Err(EncodeError::Unsupported('.', 0x2E))
        );
    }

    #[test]
    fn digest_covers_text_and_terminators() {
        let report_text = format!("{:<80}\n", "JOSH");
        let expected = {
            let mut hasher = Sha256::new();
            hasher.update(report_text.as_bytes());
            format!("{:02x}", hasher.finalize())
        };
        let padded = format!("{:<80}", "JOSH");
        assert_eq!(digest_lines([padded.as_str()]), expected);
        assert_ne!(digest_lines([padded.trim_end()]), expected);
    }

    #[test]
    fn report_text_matches_reader_output() {
        let deck = encode_deck(&ExtendedBcd, "X1\n-2", true).unwrap();
        let report = decode_deck(Cursor::new(deck), ReaderOptions::default()).unwrap();
        assert_eq!(
            report.text(),
            format!("{:<80}\n{:<80}\n", "X1", " 2")
        );
        assert_eq!(report.digest, digest_lines(report.text().lines()));
    }
}
