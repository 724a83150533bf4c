//! Encoding helpers (`cardreader encode`).

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardreader::{ExtendedBcd, PunchEncoding, encode_deck};
use clap::Args;
use tracing::debug;

use crate::cli::utils::read_text_arg;

/// Arguments for `cardreader encode`.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Input text (falls back to stdin if omitted).
    #[arg(long)]
    pub text: Option<String>,
    /// Read input from file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Punch out the first column of the final card so readers stop there.
    #[arg(long)]
    pub sentinel: bool,
}

/// Execute an encode command.
pub fn handle(args: EncodeArgs) -> Result<()> {
    let text = read_text_arg(args.text, args.from)?;
    let encoder = ExtendedBcd::new();
    let deck = encode_deck(&encoder, &text, args.sentinel)
        .with_context(|| format!("failed to encode text with {}", encoder.name()))?;
    debug!(bytes = deck.len(), sentinel = args.sentinel, "encoded deck");
    io::stdout().write_all(deck.as_bytes())?;
    Ok(())
}
