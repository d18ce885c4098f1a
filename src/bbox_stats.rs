use crate::font_blob::GlyphBitmap;

/// Tight rectangle around a glyph's ink, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBBox {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl GlyphBBox {
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontStats {
    pub average_width: f64,
    pub average_height: f64,
    /// Glyphs that contributed, i.e. those with any ink.
    pub samples: usize,
}

impl FontStats {
    pub fn new(average_width: f64, average_height: f64) -> Self {
        Self {
            average_width,
            average_height,
            samples: 0,
        }
    }
}

/// `None` for a glyph without any nonzero pixel.
pub fn glyph_bbox(glyph: &GlyphBitmap<'_>) -> Option<GlyphBBox> {
    let mut bbox: Option<GlyphBBox> = None;

    for row in 0..glyph.height() {
        let pixels = glyph.row(row);
        let Some(first) = pixels.iter().position(|&px| px != 0) else {
            continue;
        };
        let last = pixels.iter().rposition(|&px| px != 0).unwrap_or(first);

        bbox = Some(match bbox {
            None => GlyphBBox {
                min_row: row,
                max_row: row,
                min_col: first,
                max_col: last,
            },
            Some(current) => GlyphBBox {
                min_row: current.min_row,
                max_row: row,
                min_col: current.min_col.min(first),
                max_col: current.max_col.max(last),
            },
        });
    }

    bbox
}

/// Mean ink box over glyphs with ink. Blank glyphs are left out of both
/// averages; a font with no ink at all yields zeros.
pub fn average_bbox<'a, I>(glyphs: I) -> FontStats
where
    I: IntoIterator<Item = GlyphBitmap<'a>>,
{
    let mut width_sum = 0usize;
    let mut height_sum = 0usize;
    let mut samples = 0usize;

    for bbox in glyphs.into_iter().filter_map(|glyph| glyph_bbox(&glyph)) {
        width_sum += bbox.width();
        height_sum += bbox.height();
        samples += 1;
    }

    if samples == 0 {
        return FontStats::default();
    }

    FontStats {
        average_width: width_sum as f64 / samples as f64,
        average_height: height_sum as f64 / samples as f64,
        samples,
    }
}
