//! Fixture tool: slices a PNG glyph sheet into a headerless blob with one
//! byte per pixel (0 or 255), the layout `fontscale` reads.
//!
//! cargo run --bin glyph_sheet_to_blob -- sheet.png --cell-width 8 --cell-height 16 -o font.bin

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fontscale::glyph_sheet::{load_sheet, sheet_to_blob, SheetLayout};

#[derive(Debug, Parser)]
#[command(
    name = "glyph_sheet_to_blob",
    about = "Converts a PNG glyph sheet into a raw bitmap font blob"
)]
struct Cli {
    sheet: PathBuf,

    #[arg(long)]
    cell_width: u32,

    #[arg(long)]
    cell_height: u32,

    #[arg(long, default_value_t = 256)]
    glyphs: u32,

    /// Alpha-weighted luma at or above which a pixel is ink
    #[arg(long, default_value_t = 128)]
    threshold: u8,

    #[arg(short = 'o', long = "output")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout = SheetLayout {
        cell_width: cli.cell_width,
        cell_height: cli.cell_height,
        glyphs: cli.glyphs,
        threshold: cli.threshold,
    };

    let sheet = load_sheet(&cli.sheet)?;
    let blob = sheet_to_blob(&sheet, &layout)
        .with_context(|| format!("failed to slice {}", cli.sheet.display()))?;
    fs::write(&cli.output, &blob)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!(
        "wrote {} ({} glyphs, {}x{}, {} bytes)",
        cli.output.display(),
        layout.glyphs,
        layout.cell_width,
        layout.cell_height,
        blob.len()
    );
    Ok(())
}
