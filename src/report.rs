use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::bbox_stats::{average_bbox, FontStats};
use crate::config::DetectorConfig;
use crate::font_blob::RawFontBlob;
use crate::glyph_grid::{detect, Score};
use crate::scale::{estimate_scale, ScaleEstimate};

#[derive(Debug, Clone, PartialEq)]
pub struct FontAnalysis {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub glyph_count: usize,
    pub score: Score,
    pub stats: FontStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub source: FontAnalysis,
    pub target: FontAnalysis,
    pub scale: ScaleEstimate,
}

pub fn analyze_font(blob: &RawFontBlob, config: &DetectorConfig) -> Result<FontAnalysis> {
    let name = blob.basename();
    let detected = detect(blob.as_bytes(), config)
        .with_context(|| format!("no glyph grid found in {name}"))?;
    let stats = average_bbox(detected.glyphs.iter());

    Ok(FontAnalysis {
        name,
        width: detected.width,
        height: detected.height,
        glyph_count: detected.glyph_count(),
        score: detected.score,
        stats,
    })
}

pub fn compare_fonts(
    source: &RawFontBlob,
    target: &RawFontBlob,
    config: &DetectorConfig,
) -> Result<ComparisonReport> {
    let source = analyze_font(source, config)?;
    let target = analyze_font(target, config)?;
    let scale = estimate_scale(&source.stats, &target.stats);
    Ok(ComparisonReport {
        source,
        target,
        scale,
    })
}

impl FontAnalysis {
    pub fn summary_line(&self, index: usize) -> String {
        format!(
            "Font {}: {} — size: {}x{}, avg char bbox: {:.2}x{:.2}",
            index,
            self.name,
            self.width,
            self.height,
            self.stats.average_width,
            self.stats.average_height
        )
    }
}

impl ComparisonReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.source.summary_line(1));
        let _ = writeln!(out, "{}", self.target.summary_line(2));
        let _ = writeln!(out);
        let _ = writeln!(out, "Estimated scaling factor:");
        let _ = writeln!(out, "  Width:  {:.2}x", self.scale.width);
        let _ = writeln!(out, "  Height: {:.2}x", self.scale.height);
        let _ = writeln!(
            out,
            "  Geometric mean: {:.2}x (overall font size)",
            self.scale.geometric_mean
        );
        out
    }
}
