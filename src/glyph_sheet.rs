//! Converts a PNG glyph sheet into the raw one-byte-per-pixel blob layout
//! that grid detection reads. Cells are taken left to right, top to bottom.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{Rgba, RgbaImage};

pub const INK: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub glyphs: u32,
    /// Minimum alpha-weighted luma for a pixel to count as ink.
    pub threshold: u8,
}

impl SheetLayout {
    pub fn columns(&self, sheet_width: u32) -> u32 {
        sheet_width / self.cell_width
    }
}

pub fn load_sheet(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to open glyph sheet {}", path.display()))?;
    Ok(image.to_rgba8())
}

pub fn sheet_to_blob(sheet: &RgbaImage, layout: &SheetLayout) -> Result<Vec<u8>> {
    if layout.cell_width == 0 || layout.cell_height == 0 {
        bail!(
            "cell size must be non-zero, got {}x{}",
            layout.cell_width,
            layout.cell_height
        );
    }

    let columns = layout.columns(sheet.width());
    if columns == 0 {
        bail!(
            "sheet is {} px wide, narrower than one {} px cell",
            sheet.width(),
            layout.cell_width
        );
    }
    let rows = layout.glyphs.div_ceil(columns);
    let needed_height = rows.checked_mul(layout.cell_height).with_context(|| {
        format!(
            "{} rows of {} px cells overflow the sheet height",
            rows, layout.cell_height
        )
    })?;
    if needed_height > sheet.height() {
        bail!(
            "sheet {}x{} holds {} glyphs of {}x{}, {} requested",
            sheet.width(),
            sheet.height(),
            u64::from(columns) * u64::from(sheet.height() / layout.cell_height),
            layout.cell_width,
            layout.cell_height,
            layout.glyphs
        );
    }

    let blob_len = (layout.cell_width as usize)
        .checked_mul(layout.cell_height as usize)
        .and_then(|size| size.checked_mul(layout.glyphs as usize))
        .context("glyph blob size overflows usize")?;
    let mut blob = Vec::with_capacity(blob_len);
    for index in 0..layout.glyphs {
        let base_x = (index % columns) * layout.cell_width;
        let base_y = (index / columns) * layout.cell_height;
        for y in 0..layout.cell_height {
            for x in 0..layout.cell_width {
                let pixel = sheet.get_pixel(base_x + x, base_y + y);
                blob.push(if coverage(pixel) >= layout.threshold {
                    INK
                } else {
                    0
                });
            }
        }
    }
    Ok(blob)
}

fn coverage(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, a] = pixel.0;
    let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    (luma * a as u32 / 255) as u8
}
