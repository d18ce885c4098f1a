use std::fmt;
use std::ops::RangeInclusive;

use anyhow::Error;

pub const FONT_READ_FAILED: &str = "FONT_READ_FAILED";
pub const GRID_DETECTION_FAILED: &str = "GRID_DETECTION_FAILED";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
}

impl CodedError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

/// No candidate grid in the search space partitions the blob with enough glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionError {
    pub blob_len: usize,
    pub widths: RangeInclusive<usize>,
    pub heights: RangeInclusive<usize>,
    pub min_glyphs: usize,
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to detect glyph size: no width in {}..={} and height in {}..={} divides {} bytes into at least {} glyphs",
            self.widths.start(),
            self.widths.end(),
            self.heights.start(),
            self.heights.end(),
            self.blob_len,
            self.min_glyphs
        )
    }
}

impl std::error::Error for DetectionError {}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}

/// Stable code for the first typed failure in the chain.
pub fn error_code(error: &Error) -> Option<&'static str> {
    for cause in error.chain() {
        if let Some(coded) = cause.downcast_ref::<CodedError>() {
            return Some(coded.code);
        }
        if cause.downcast_ref::<DetectionError>().is_some() {
            return Some(GRID_DETECTION_FAILED);
        }
    }
    None
}
