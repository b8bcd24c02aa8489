use crate::shared::config::ProcessorConfig;

/// Maps how much of the analysis frame the hand covers to a grid width.
///
/// Area grows with the square of apparent hand size, so the ratio goes
/// through a square root: `width = base + sqrt(ratio) * scale`.
pub struct DistanceEstimator {
    frame_area: f64,
    max_area_ratio: f64,
    base: f64,
    scale: f64,
    resting: u32,
    min_width: u32,
    max_width: u32,
}

impl DistanceEstimator {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            frame_area: config.analysis_area(),
            max_area_ratio: config.max_area_ratio,
            base: config.base_resolution as f64,
            scale: config.resolution_scale,
            resting: config.resting_resolution,
            min_width: config.min_width,
            max_width: config.max_width,
        }
    }

    /// Target width for a region of `area` analysis pixels, or the resting
    /// width when no region was accepted.
    pub fn estimate(&self, area: Option<f64>) -> u32 {
        let Some(area) = area else {
            return self.resting.clamp(self.min_width, self.max_width);
        };
        let ratio = if self.frame_area > 0.0 {
            (area / self.frame_area).clamp(0.0, self.max_area_ratio)
        } else {
            0.0
        };
        let width = (self.base + ratio.sqrt() * self.scale).round();
        (width.max(0.0) as u32).clamp(self.min_width, self.max_width)
    }
}
