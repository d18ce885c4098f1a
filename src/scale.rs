use crate::bbox_stats::FontStats;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleEstimate {
    pub width: f64,
    pub height: f64,
    /// sqrt(width * height), zero unless both axes are known.
    pub geometric_mean: f64,
}

/// How much larger `target` is than `source`. An axis whose source average is
/// zero cannot be compared and reports zero instead of failing.
pub fn estimate_scale(source: &FontStats, target: &FontStats) -> ScaleEstimate {
    let width = axis_ratio(source.average_width, target.average_width);
    let height = axis_ratio(source.average_height, target.average_height);
    let geometric_mean = if width != 0.0 && height != 0.0 {
        (width * height).sqrt()
    } else {
        0.0
    };

    ScaleEstimate {
        width,
        height,
        geometric_mean,
    }
}

fn axis_ratio(source: f64, target: f64) -> f64 {
    if source == 0.0 {
        0.0
    } else {
        target / source
    }
}
