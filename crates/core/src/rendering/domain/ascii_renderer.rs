use image::RgbImage;

use crate::shared::config::ProcessorConfig;
use crate::shared::constants::CHARACTER_RAMP;
use crate::vision::domain::vision_primitives::VisionPrimitives;

/// Turns the full-resolution frame into a rectangular character grid.
pub struct AsciiRenderer {
    ramp: Vec<char>,
    glyph_aspect: f64,
    clip_limit: f32,
    tiles: u32,
}

impl AsciiRenderer {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            ramp: CHARACTER_RAMP.to_vec(),
            glyph_aspect: config.glyph_aspect,
            clip_limit: config.clahe_clip_limit,
            tiles: config.clahe_tiles,
        }
    }

    /// Row count for a grid `width` characters wide. Glyph cells are taller
    /// than wide, so rows are scaled by `glyph_aspect`. Never less than one.
    pub fn grid_height(&self, width: u32, frame_width: u32, frame_height: u32) -> u32 {
        if frame_width == 0 {
            return 1;
        }
        let rows = width as f64 * (frame_height as f64 / frame_width as f64) * self.glyph_aspect;
        (rows.round() as u32).max(1)
    }

    pub fn render(
        &self,
        vision: &dyn VisionPrimitives,
        frame: &RgbImage,
        width: u32,
    ) -> Vec<String> {
        let width = width.max(1);
        let height = self.grid_height(width, frame.width(), frame.height());

        let small = vision.resize(frame, width, height);
        let gray = vision.to_grayscale(&small);
        let equalized = vision.equalize_adaptive(&gray, self.clip_limit, self.tiles);

        equalized
            .rows()
            .map(|row| row.map(|px| self.glyph(px.0[0])).collect())
            .collect()
    }

    /// Darkest intensity maps to the sparsest glyph.
    fn glyph(&self, intensity: u8) -> char {
        let last = self.ramp.len().saturating_sub(1);
        let index = intensity as usize * last / 255;
        self.ramp.get(index).copied().unwrap_or(' ')
    }
}
