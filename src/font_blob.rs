use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error_codes::{CodedError, FONT_READ_FAILED};

/// Headerless bitmap font file held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFontBlob {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl RawFontBlob {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: None,
            bytes: bytes.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|error| {
            CodedError::new(
                FONT_READ_FAILED,
                format!("failed to read font file '{}': {error}", path.display()),
            )
        })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            bytes,
        })
    }

    /// Final path component, or `<memory>` for blobs not read from disk.
    pub fn basename(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_owned())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One glyph cell inside a flat buffer. Pixel (row, col) lives at
/// `offset + row * width + col`.
#[derive(Debug, Clone, Copy)]
pub struct GlyphBitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> GlyphBitmap<'a> {
    /// Returns `None` unless `data` holds exactly `width * height` bytes.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, row: usize) -> &'a [u8] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn has_ink(&self) -> bool {
        self.data.iter().any(|&px| px != 0)
    }
}

/// Fixed-size glyph grid laid over a borrowed byte buffer, in file order.
#[derive(Debug, Clone, Copy)]
pub struct GlyphGrid<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    count: usize,
}

impl<'a> GlyphGrid<'a> {
    /// Splits the first `count * width * height` bytes of `data` into glyphs.
    /// Returns `None` when the buffer is too short or a dimension is zero.
    pub fn new(data: &'a [u8], width: usize, height: usize, count: usize) -> Option<Self> {
        let glyph_size = width.checked_mul(height)?;
        let total = glyph_size.checked_mul(count)?;
        if glyph_size == 0 || total > data.len() {
            return None;
        }
        Some(Self {
            data: &data[..total],
            width,
            height,
            count,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn glyph(&self, index: usize) -> Option<GlyphBitmap<'a>> {
        if index >= self.count {
            return None;
        }
        let glyph_size = self.width * self.height;
        let start = index * glyph_size;
        GlyphBitmap::new(&self.data[start..start + glyph_size], self.width, self.height)
    }

    pub fn iter(&self) -> impl Iterator<Item = GlyphBitmap<'a>> + 'a {
        let (width, height) = (self.width, self.height);
        self.data
            .chunks_exact(width * height)
            .filter_map(move |chunk| GlyphBitmap::new(chunk, width, height))
    }
}
