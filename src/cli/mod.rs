//! Command-line interface wiring for the `cardreader` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! the submodule for each command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod decode;
pub mod digest;
pub mod encode;
pub mod logger;
pub mod render;
pub mod utils;

/// Parsed CLI entrypoint for the `cardreader` binary.
#[derive(Parser, Debug)]
#[command(
    name = "cardreader",
    version,
    about = "Decode 80-column punch cards (extended BCD)",
    long_about = "Decode 80-column punch cards (extended BCD).\n\n\
                  Without a command, cards are read from stdin and decoded to stdout."
)]
pub struct Cli {
    /// Log decoding details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Command to execute (defaults to `decode`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Commands made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a deck into one line of text per card.
    Decode(decode::DecodeArgs),
    /// Print the SHA-256 digest of a decoded deck.
    Digest(digest::DigestArgs),
    /// Punch text into a deck in the card text format.
    Encode(encode::EncodeArgs),
    #[command(subcommand)]
    Render(render::RenderCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => decode::handle(decode::DecodeArgs::default()),
        Some(Command::Decode(args)) => decode::handle(args),
        Some(Command::Digest(args)) => digest::handle(args),
        Some(Command::Encode(args)) => encode::handle(args),
        Some(Command::Render(cmd)) => render::handle(cmd),
    }
}
