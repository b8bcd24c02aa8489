use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    ANALYSIS_HEIGHT, ANALYSIS_WIDTH, CONFIG_DIR_NAME, CONFIG_FILE_NAME, GLYPH_ASPECT,
    SKIN_LOWER_YCRCB, SKIN_UPPER_YCRCB,
};
use crate::shared::error::ConfigError;

/// Every tunable of the per-frame pipeline.
///
/// All thresholds are empirical. Areas and depths are measured on the
/// analysis frame (`analysis_width` x `analysis_height`), never on the
/// original frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub analysis_width: u32,
    pub analysis_height: u32,
    /// Gaussian sigma applied before color thresholding.
    pub blur_sigma: f32,
    /// Inclusive (Y, Cr, Cb) lower bound for skin pixels.
    pub skin_lower: [u8; 3],
    /// Inclusive (Y, Cr, Cb) upper bound for skin pixels.
    pub skin_upper: [u8; 3],
    /// Radius of the square element used to open (despeckle) the mask.
    pub open_radius: u8,
    /// Radius of the larger square element used to close gaps in the mask.
    pub close_radius: u8,
    /// Regions smaller than this are noise.
    pub min_area: f64,
    /// Regions larger than this are lighting artifacts.
    pub max_area: f64,
    /// Regions whose centroid lies in this top fraction of the frame are faces.
    pub face_zone_fraction: f64,
    pub min_defect_depth: f64,
    pub max_defect_angle_deg: f64,
    pub open_min_finger_gaps: usize,
    /// Solidity below this reads as an open hand even without clean defects.
    pub open_max_solidity: f64,
    /// Solidity above this (with a compact aspect) reads as a fist.
    pub fist_min_solidity: f64,
    pub fist_min_aspect: f64,
    pub fist_max_aspect: f64,
    /// Upper clamp for `region_area / frame_area`.
    pub max_area_ratio: f64,
    pub base_resolution: u32,
    pub resolution_scale: f64,
    /// Width emitted while no hand is visible.
    pub resting_resolution: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub resolution_window_size: usize,
    pub theme_window_size: usize,
    /// How many times a no-hand frame is pushed into the gesture window.
    pub no_hand_votes: usize,
    pub glyph_aspect: f64,
    pub clahe_clip_limit: f32,
    pub clahe_tiles: u32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            analysis_width: ANALYSIS_WIDTH,
            analysis_height: ANALYSIS_HEIGHT,
            blur_sigma: 1.0,
            skin_lower: SKIN_LOWER_YCRCB,
            skin_upper: SKIN_UPPER_YCRCB,
            open_radius: 1,
            close_radius: 3,
            min_area: 2000.0,
            max_area: (ANALYSIS_WIDTH * ANALYSIS_HEIGHT) as f64 * 0.8,
            face_zone_fraction: 0.25,
            min_defect_depth: 8.0,
            max_defect_angle_deg: 90.0,
            open_min_finger_gaps: 2,
            open_max_solidity: 0.75,
            fist_min_solidity: 0.85,
            fist_min_aspect: 0.5,
            fist_max_aspect: 1.6,
            max_area_ratio: 0.6,
            base_resolution: 60,
            resolution_scale: 180.0,
            resting_resolution: 60,
            min_width: 40,
            max_width: 200,
            resolution_window_size: 5,
            theme_window_size: 30,
            no_hand_votes: 3,
            glyph_aspect: GLYPH_ASPECT,
            clahe_clip_limit: 2.0,
            clahe_tiles: 8,
        }
    }
}

impl ProcessorConfig {
    /// `<config dir>/GestureAscii/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads and validates a JSON config file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ProcessorConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads an explicit path, or the default path when it exists, or defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.analysis_width == 0 || self.analysis_height == 0 {
            return invalid(format!(
                "analysis size must be positive, got {}x{}",
                self.analysis_width, self.analysis_height
            ));
        }
        if self
            .skin_lower
            .iter()
            .zip(self.skin_upper.iter())
            .any(|(lo, hi)| lo > hi)
        {
            return invalid(format!(
                "skin_lower {:?} exceeds skin_upper {:?}",
                self.skin_lower, self.skin_upper
            ));
        }
        if self.min_area < 0.0 || self.min_area > self.max_area {
            return invalid(format!(
                "area bounds must satisfy 0 <= min_area <= max_area, got {}..{}",
                self.min_area, self.max_area
            ));
        }
        if !(0.0..=1.0).contains(&self.face_zone_fraction) {
            return invalid(format!(
                "face_zone_fraction must be between 0.0 and 1.0, got {}",
                self.face_zone_fraction
            ));
        }
        if !(0.0..=1.0).contains(&self.max_area_ratio) {
            return invalid(format!(
                "max_area_ratio must be between 0.0 and 1.0, got {}",
                self.max_area_ratio
            ));
        }
        if self.fist_min_aspect > self.fist_max_aspect {
            return invalid(format!(
                "fist aspect band is inverted: {}..{}",
                self.fist_min_aspect, self.fist_max_aspect
            ));
        }
        if self.min_width == 0 || self.min_width > self.max_width {
            return invalid(format!(
                "width bounds must satisfy 1 <= min_width <= max_width, got {}..{}",
                self.min_width, self.max_width
            ));
        }
        if self.resolution_window_size == 0 || self.theme_window_size == 0 {
            return invalid("smoothing windows must hold at least one sample".to_string());
        }
        if self.no_hand_votes == 0 {
            return invalid("no_hand_votes must be at least 1".to_string());
        }
        if self.glyph_aspect <= 0.0 {
            return invalid(format!(
                "glyph_aspect must be positive, got {}",
                self.glyph_aspect
            ));
        }
        if self.clahe_tiles == 0 {
            return invalid("clahe_tiles must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn analysis_area(&self) -> f64 {
        self.analysis_width as f64 * self.analysis_height as f64
    }
}
