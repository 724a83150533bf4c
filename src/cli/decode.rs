//! Deck decoding (`cardreader decode`, also the default command).

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardreader::{ReaderOptions, decode_deck, decode_stream};
use clap::Args;
use tracing::info;

use crate::cli::common::OutputFormatArg;
use crate::cli::utils::{input_label, open_input};

/// Arguments for `cardreader decode`.
#[derive(Args, Debug, Default)]
pub struct DecodeArgs {
    /// Deck file to read (`-` or omitted for stdin).
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Fail on malformed rows and undecodable columns instead of reading them as blank.
    #[arg(long)]
    pub strict: bool,
    /// Output format.
    #[arg(long, default_value_t = OutputFormatArg::Text, value_enum)]
    pub format: OutputFormatArg,
}

/// Execute a decode command.
pub fn handle(args: DecodeArgs) -> Result<()> {
    let options = ReaderOptions {
        strict: args.strict,
    };
    let path = args.input.as_deref();
    let input = open_input(path)?;
    match args.format {
        OutputFormatArg::Text => {
            let stdout = io::stdout();
            let written = decode_stream(input, stdout.lock(), options)
                .with_context(|| format!("failed to decode cards from {}", input_label(path)))?;
            info!(cards = written, "decoded deck");
        }
        OutputFormatArg::Json => {
            let report = decode_deck(input, options)
                .with_context(|| format!("failed to decode cards from {}", input_label(path)))?;
            let json = serde_json::to_string_pretty(&report)
                .context("failed to serialize deck report")?;
            println!("{}", json);
        }
    }
    Ok(())
}
