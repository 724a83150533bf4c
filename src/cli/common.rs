//! Shared clap helper types for CLI commands.

use cardreader::{CardImageStyle, RenderStyle};
use clap::ValueEnum;

/// Output formats for decoded decks.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormatArg {
    /// One decoded line per card.
    #[default]
    Text,
    /// A JSON report with per-card details and the deck digest.
    Json,
}

/// Render styles available for ASCII punch views.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RenderStyleArg {
    #[value(name = "ascii-x")]
    AsciiX,
    #[value(name = "ascii-01")]
    Ascii01,
}

impl From<RenderStyleArg> for RenderStyle {
    fn from(value: RenderStyleArg) -> Self {
        match value {
            RenderStyleArg::AsciiX => RenderStyle::AsciiX,
            RenderStyleArg::Ascii01 => RenderStyle::Ascii01,
        }
    }
}

/// Styles available for PNG rendering.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CardImageStyleArg {
    Plain,
    Interpreter,
}

impl From<CardImageStyleArg> for CardImageStyle {
    fn from(value: CardImageStyleArg) -> CardImageStyle {
        match value {
            CardImageStyleArg::Plain => CardImageStyle::Plain,
            CardImageStyleArg::Interpreter => CardImageStyle::Interpreter,
        }
    }
}
