//! Glyph geometry detection for headerless bitmap font blobs and ink-based
//! scale estimation between two such fonts.
//!
//! The pipeline is `RawFontBlob` -> [`glyph_grid::detect`] ->
//! [`bbox_stats::average_bbox`] -> [`scale::estimate_scale`], wrapped up by
//! [`report::compare_fonts`].

pub mod bbox_stats;
pub mod config;
pub mod error_codes;
pub mod font_blob;
pub mod glyph_grid;
pub mod glyph_sheet;
pub mod report;
pub mod scale;

pub use bbox_stats::{average_bbox, glyph_bbox, FontStats, GlyphBBox};
pub use config::DetectorConfig;
pub use error_codes::DetectionError;
pub use font_blob::{GlyphBitmap, GlyphGrid, RawFontBlob};
pub use glyph_grid::{detect, CandidateGrid, DetectedGrid, Score};
pub use report::{analyze_font, compare_fonts, ComparisonReport, FontAnalysis};
pub use scale::{estimate_scale, ScaleEstimate};
