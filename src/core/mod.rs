//! Core domain primitives: the card matrix, the extended BCD table, and deck reading.

pub mod card;
pub mod deck;
pub mod encoding;
pub mod error;
pub mod reader;

pub use card::{Card, PUNCH, RenderStyle};
pub use deck::{CardSummary, DeckReport, Termination, decode_deck, digest_lines, encode_deck};
pub use encoding::{COLS, ColumnMask, EXTENDED_BCD, EncodeError, ExtendedBcd, PunchEncoding, ROWS};
pub use error::CardError;
pub use reader::{CardReader, DecodedCard, Fill, ReaderOptions};
