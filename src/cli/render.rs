//! Rendering commands (`cardreader render ...`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use cardreader::{ImageRenderOptions, MAX_DPI, MIN_DPI, ReaderOptions, render_card_image};
use clap::{Args, Subcommand};
use tracing::info;

use crate::cli::common::{CardImageStyleArg, RenderStyleArg};
use crate::cli::utils::{input_label, read_cards, write_output};

/// Available render subcommands.
#[derive(Subcommand, Debug)]
pub enum RenderCommand {
    /// Print each card as a labelled punch grid with its decoded text.
    Listing(RenderListingArgs),
    /// Render PNG images of the card faces.
    Image(RenderImageArgs),
}

/// Args for `cardreader render listing`.
#[derive(Args, Debug)]
pub struct RenderListingArgs {
    /// Deck file to read (`-` or omitted for stdin).
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Rendering style for punched cells.
    #[arg(long, default_value_t = RenderStyleArg::AsciiX, value_enum)]
    pub style: RenderStyleArg,
}

/// Args for `cardreader render image`.
#[derive(Args, Debug)]
pub struct RenderImageArgs {
    /// Deck file to read (`-` or omitted for stdin).
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Output `.png` file (single card) or directory for generated PNGs.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Visual style applied to the card face.
    #[arg(long, default_value_t = CardImageStyleArg::Interpreter, value_enum)]
    pub style: CardImageStyleArg,
    /// Dots per inch used when rasterising.
    #[arg(long, default_value_t = 150)]
    pub dpi: u32,
}

/// Execute a render command.
pub fn handle(command: RenderCommand) -> Result<()> {
    match command {
        RenderCommand::Listing(args) => listing(args),
        RenderCommand::Image(args) => image(args),
    }
}

fn listing(args: RenderListingArgs) -> Result<()> {
    let cards = read_cards(args.input.as_deref(), ReaderOptions::default())?;
    let mut output = String::new();
    for card in &cards {
        if card.index > 1 {
            output.push('\n');
        }
        output.push_str(&format!(
            "Card {:>4} | rows read {:>2}{}\n",
            card.index,
            card.rows_read,
            if card.sentinel { " | last card" } else { "" }
        ));
        output.push_str(&card.card.render(args.style.into()));
    }
    match args.output {
        Some(path) => {
            write_output(&path, &output)?;
            info!(
                cards = cards.len(),
                output = %path.display(),
                "wrote listing"
            );
        }
        None => print!("{}", output),
    }
    Ok(())
}

fn image(args: RenderImageArgs) -> Result<()> {
    let cards = read_cards(args.input.as_deref(), ReaderOptions::default())?;
    let options = ImageRenderOptions {
        style: args.style.into(),
        dpi: args.dpi.clamp(MIN_DPI, MAX_DPI),
    };

    let output_path = args.output;
    let is_single_file_target = output_path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if cards.len() > 1 && is_single_file_target {
        return Err(anyhow!(
            "output path must be a directory when rendering {} cards",
            cards.len()
        ));
    }

    if is_single_file_target {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory {}", parent.display())
                })?;
            }
        }
    } else {
        fs::create_dir_all(&output_path).with_context(|| {
            format!("failed to create output directory {}", output_path.display())
        })?;
    }

    for card in &cards {
        let target_path = if is_single_file_target {
            output_path.clone()
        } else {
            output_path.join(format!("card_{:04}.png", card.index))
        };
        render_card_image(&card.card, &options)
            .save(&target_path)
            .with_context(|| format!("failed to write {}", target_path.display()))?;
    }

    println!(
        "Rendered {} card image(s) from {} to {} at {} DPI",
        cards.len(),
        input_label(args.input.as_deref()),
        output_path.display(),
        options.dpi
    );
    Ok(())
}
