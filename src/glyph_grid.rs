//! Glyph size detection for headerless bitmap font blobs.
//!
//! A blob is a run of equally sized `width * height` glyph cells with no
//! header. Every (width, height) pair in the configured bounds that splits the
//! blob exactly into at least `min_glyphs` cells is a candidate. Candidates are
//! scored by the fraction of cells holding at least one nonzero byte and the
//! best one wins. Ties go to the candidate that comes first in
//! ascending-width, then ascending-height order.

use std::cmp::Ordering;
use std::ops::RangeInclusive;
use std::thread;

use crate::config::DetectorConfig;
use crate::error_codes::DetectionError;
use crate::font_blob::GlyphGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateGrid {
    pub width: usize,
    pub height: usize,
    pub glyph_count: usize,
}

/// Fraction of non-empty glyphs, kept as an exact ratio.
#[derive(Debug, Clone, Copy)]
pub struct Score {
    pub non_empty: usize,
    pub total: usize,
}

impl Score {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.non_empty as f64 / self.total as f64
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        // a/b vs c/d  <=>  a*d vs c*b; totals are never zero for real candidates
        let lhs = self.non_empty as u128 * other.total.max(1) as u128;
        let rhs = other.non_empty as u128 * self.total.max(1) as u128;
        lhs.cmp(&rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredGrid {
    pub grid: CandidateGrid,
    pub score: Score,
}

/// Winning grid together with the decoded glyphs it implies.
#[derive(Debug, Clone, Copy)]
pub struct DetectedGrid<'a> {
    pub width: usize,
    pub height: usize,
    pub score: Score,
    pub glyphs: GlyphGrid<'a>,
}

impl DetectedGrid<'_> {
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// Largest glyph size in bytes that still yields `min_glyphs` cells.
fn max_glyph_size(len: usize, min_glyphs: usize) -> usize {
    len / min_glyphs.max(1)
}

/// Every grid in `widths` x `heights` that divides `len` bytes into at least
/// `min_glyphs` cells, width-major. Enumeration stops once a cell no longer
/// fits `min_glyphs` times.
pub fn candidates(
    len: usize,
    widths: RangeInclusive<usize>,
    heights: RangeInclusive<usize>,
    min_glyphs: usize,
) -> impl Iterator<Item = CandidateGrid> {
    let limit = max_glyph_size(len, min_glyphs);
    widths
        .take_while(move |&width| width <= limit)
        .flat_map(move |width| {
            heights
                .clone()
                .take_while(move |&height| width.saturating_mul(height) <= limit)
                .filter_map(move |height| {
                    let glyph_size = width * height;
                    if glyph_size == 0 || len % glyph_size != 0 {
                        return None;
                    }
                    let glyph_count = len / glyph_size;
                    if glyph_count < min_glyphs {
                        return None;
                    }
                    Some(CandidateGrid {
                        width,
                        height,
                        glyph_count,
                    })
                })
        })
}

/// Scores one candidate. `None` means the buffer could not be decoded with
/// this geometry and the candidate should be skipped.
pub fn score_candidate(data: &[u8], grid: CandidateGrid) -> Option<ScoredGrid> {
    let glyphs = GlyphGrid::new(data, grid.width, grid.height, grid.glyph_count)?;
    let non_empty = glyphs.iter().filter(|glyph| glyph.has_ink()).count();
    Some(ScoredGrid {
        grid,
        score: Score {
            non_empty,
            total: grid.glyph_count,
        },
    })
}

pub fn detect<'a>(
    data: &'a [u8],
    config: &DetectorConfig,
) -> Result<DetectedGrid<'a>, DetectionError> {
    let best = match config.worker_count() {
        0 | 1 => search_sequential(data, config),
        workers => search_parallel(data, config, workers),
    };

    let detection_error = || DetectionError {
        blob_len: data.len(),
        widths: config.widths(),
        heights: config.heights(),
        min_glyphs: config.min_glyphs,
    };
    let best = best.ok_or_else(detection_error)?;
    let glyphs = GlyphGrid::new(
        data,
        best.grid.width,
        best.grid.height,
        best.grid.glyph_count,
    )
    .ok_or_else(detection_error)?;

    Ok(DetectedGrid {
        width: best.grid.width,
        height: best.grid.height,
        score: best.score,
        glyphs,
    })
}

fn search_sequential(data: &[u8], config: &DetectorConfig) -> Option<ScoredGrid> {
    let mut best: Option<ScoredGrid> = None;
    let all = candidates(
        data.len(),
        config.widths(),
        config.heights(),
        config.min_glyphs,
    );
    for scored in all.filter_map(|grid| score_candidate(data, grid)) {
        // strict: an equal score found later never replaces the earlier grid
        if best.map_or(true, |current| scored.score > current.score) {
            best = Some(scored);
        }
    }
    best
}

fn search_parallel(data: &[u8], config: &DetectorConfig, workers: usize) -> Option<ScoredGrid> {
    let limit = max_glyph_size(data.len(), config.min_glyphs);
    let widths = config
        .widths()
        .take_while(|&width| width <= limit)
        .collect::<Vec<_>>();
    if widths.is_empty() {
        return None;
    }
    let workers = workers.min(widths.len());
    let chunk_len = widths.len().div_ceil(workers);

    let scored = thread::scope(|scope| {
        let handles = widths
            .chunks(chunk_len)
            .map(|chunk| {
                let (first, last) = (chunk[0], chunk[chunk.len() - 1]);
                scope.spawn(move || {
                    candidates(data.len(), first..=last, config.heights(), config.min_glyphs)
                        .filter_map(|grid| score_candidate(data, grid))
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect::<Vec<_>>()
    });

    scored.into_iter().min_by(rank)
}

/// Higher score first, then smaller width, then smaller height.
fn rank(a: &ScoredGrid, b: &ScoredGrid) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.grid.width.cmp(&b.grid.width))
        .then(a.grid.height.cmp(&b.grid.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob_with_ink(width: usize, height: usize, count: usize, inked: &[usize]) -> Vec<u8> {
        let size = width * height;
        let mut data = vec![0u8; size * count];
        for &index in inked {
            data[index * size..(index + 1) * size].fill(0xFF);
        }
        data
    }

    #[test]
    fn candidates_follow_width_then_height_order() {
        let found = candidates(4096, 4..=32, 4..=64, 64)
            .map(|grid| (grid.width, grid.height))
            .collect::<Vec<_>>();

        let mut sorted = found.clone();
        sorted.sort();
        assert_eq!(found, sorted);
        assert_eq!(found.first(), Some(&(4, 4)));
        assert!(found.contains(&(8, 8)));
        assert!(found
            .iter()
            .all(|&(w, h)| 4096 % (w * h) == 0 && 4096 / (w * h) >= 64));
    }

    #[test]
    fn min_glyphs_boundary_is_inclusive() {
        // 10x10 glyphs: 63 cells excluded, 64 cells included
        let short = candidates(63 * 100, 10..=10, 10..=10, 64).count();
        let exact = candidates(64 * 100, 10..=10, 10..=10, 64).count();
        assert_eq!(short, 0);
        assert_eq!(exact, 1);
    }

    #[test]
    fn score_counts_glyphs_with_any_ink() {
        let mut data = vec![0u8; 16 * 4];
        data[16 + 5] = 1;
        data[3 * 16] = 200;
        let grid = CandidateGrid {
            width: 4,
            height: 4,
            glyph_count: 4,
        };
        let scored = score_candidate(&data, grid).unwrap();
        assert_eq!(scored.score.non_empty, 2);
        assert_eq!(scored.score.fraction(), 0.5);
    }

    #[test]
    fn score_skips_undecodable_candidate() {
        let data = vec![1u8; 10];
        let grid = CandidateGrid {
            width: 4,
            height: 4,
            glyph_count: 1,
        };
        assert!(score_candidate(&data, grid).is_none());
    }

    #[test]
    fn equal_ratios_compare_equal() {
        let half = Score {
            non_empty: 32,
            total: 64,
        };
        let also_half = Score {
            non_empty: 64,
            total: 128,
        };
        let more = Score {
            non_empty: 33,
            total: 64,
        };
        assert_eq!(half, also_half);
        assert!(more > half);
    }

    #[test]
    fn detects_known_geometry() {
        // 64 5x5 glyphs with one centre pixel each. 4 does not divide 25, so no
        // earlier candidate shares the true partition, and the 4x4 and 4x5
        // splits must leave some cells blank.
        let mut data = vec![0u8; 25 * 64];
        for glyph in 0..64 {
            data[glyph * 25 + 2 * 5 + 2] = 0x80;
        }

        let detected = detect(&data, &DetectorConfig::default()).unwrap();
        assert_eq!((detected.width, detected.height), (5, 5));
        assert_eq!(detected.glyph_count(), 64);
        assert_eq!(detected.score.fraction(), 1.0);
    }

    #[test]
    fn same_partition_under_narrower_width_wins_tie() {
        // 4x16 and 8x8 cut 4096 bytes at the same 64-byte boundaries; 4x4 and
        // 4x8 score the same 1/64 ratio too, and 4x4 is searched first
        let data = blob_with_ink(8, 8, 64, &[0]);
        let detected = detect(&data, &DetectorConfig::default()).unwrap();
        assert_eq!((detected.width, detected.height), (4, 4));
        assert_eq!(detected.glyph_count(), 256);
    }

    #[test]
    fn ties_resolve_to_first_in_search_order() {
        // every byte inked: every candidate scores 1.0, so (4, 4) must win
        let data = vec![1u8; 4096];
        let detected = detect(&data, &DetectorConfig::default()).unwrap();
        assert_eq!((detected.width, detected.height), (4, 4));
        assert_eq!(detected.glyph_count(), 256);
    }

    #[test]
    fn all_blank_blob_still_detects_first_candidate() {
        let data = vec![0u8; 4096];
        let detected = detect(&data, &DetectorConfig::default()).unwrap();
        assert_eq!((detected.width, detected.height), (4, 4));
        assert_eq!(detected.score.fraction(), 0.0);
    }

    #[test]
    fn reports_detection_error_when_nothing_fits() {
        // prime length: no w*h >= 16 divides it
        let data = vec![1u8; 4099];
        let err = detect(&data, &DetectorConfig::default()).unwrap_err();
        assert_eq!(err.blob_len, 4099);
        assert_eq!(err.min_glyphs, 64);

        let err = detect(&[], &DetectorConfig::default()).unwrap_err();
        assert_eq!(err.blob_len, 0);
    }

    #[test]
    fn parallel_search_matches_sequential() {
        let inked = [0usize, 5, 17, 40, 63];
        let blobs = [
            blob_with_ink(8, 8, 64, &inked),
            blob_with_ink(8, 16, 256, &(0..200).collect::<Vec<_>>()),
            vec![1u8; 4096],
            vec![0u8; 4096],
        ];

        for data in &blobs {
            let sequential = detect(data, &DetectorConfig::default()).unwrap();
            for workers in 2..=8 {
                let config = DetectorConfig::default().with_workers(workers);
                let parallel = detect(data, &config).unwrap();
                assert_eq!(
                    (parallel.width, parallel.height, parallel.score),
                    (sequential.width, sequential.height, sequential.score),
                    "workers={workers}"
                );
            }
        }
    }

    #[test]
    fn oversized_worker_count_is_clamped_to_widths() {
        let data = blob_with_ink(8, 8, 64, &[0, 9, 33]);
        let sequential = detect(&data, &DetectorConfig::default()).unwrap();
        let config = DetectorConfig::default().with_workers(usize::MAX);
        let parallel = detect(&data, &config).unwrap();
        assert_eq!(
            (parallel.width, parallel.height, parallel.score),
            (sequential.width, sequential.height, sequential.score)
        );
    }

    #[test]
    fn unbounded_ranges_stop_at_largest_fitting_cell() {
        let data = blob_with_ink(8, 8, 64, &[0, 9, 33]);
        let expected = detect(&data, &DetectorConfig::default()).unwrap();

        let mut config = DetectorConfig::default();
        config.width.max = usize::MAX;
        config.height.max = usize::MAX;
        for workers in [1, 2, 7] {
            let detected = detect(&data, &config.clone().with_workers(workers)).unwrap();
            assert_eq!(
                (detected.width, detected.height),
                (expected.width, expected.height)
            );
        }

        // 4096 / 64 leaves at most 64 bytes per cell
        assert!(candidates(4096, 4..=usize::MAX, 4..=usize::MAX, 64)
            .all(|grid| grid.width * grid.height <= 64));
    }
}
