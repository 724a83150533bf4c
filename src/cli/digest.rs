//! Deck digest (`cardreader digest`).

use std::path::PathBuf;

use anyhow::Result;
use cardreader::{ReaderOptions, digest_lines};
use clap::Args;

use crate::cli::utils::read_cards;

/// Arguments for `cardreader digest`.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Deck file to read (`-` or omitted for stdin).
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Fail on malformed rows and undecodable columns.
    #[arg(long)]
    pub strict: bool,
}

/// Print the SHA-256 of the decoded deck as `decode` would print it.
pub fn handle(args: DigestArgs) -> Result<()> {
    let options = ReaderOptions {
        strict: args.strict,
    };
    let cards = read_cards(args.input.as_deref(), options)?;
    let digest = digest_lines(cards.iter().map(|card| card.text.as_str()));
    println!("{}", digest);
    Ok(())
}
