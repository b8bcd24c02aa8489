/// Density ramp from sparsest/darkest to densest/brightest.
pub const CHARACTER_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Analysis frame size used for segmentation and area measurements.
pub const ANALYSIS_WIDTH: u32 = 320;
pub const ANALYSIS_HEIGHT: u32 = 240;

/// Skin bounds in (Y, Cr, Cb), tuned empirically for webcam footage.
pub const SKIN_LOWER_YCRCB: [u8; 3] = [0, 133, 77];
pub const SKIN_UPPER_YCRCB: [u8; 3] = [255, 173, 127];

/// Monospace glyph cells are taller than wide; rows are scaled by this.
pub const GLYPH_ASPECT: f64 = 0.55;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const CONFIG_DIR_NAME: &str = "GestureAscii";
pub const CONFIG_FILE_NAME: &str = "config.json";
