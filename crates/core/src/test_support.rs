//! Synthetic frames for pipeline tests.
//!
//! Shapes are painted in a skin tone that falls inside the default YCrCb
//! bounds on a black background, which falls outside them.

use image::{Rgb, RgbImage};

use crate::shared::frame::Frame;

pub const SKIN: Rgb<u8> = Rgb([220, 160, 130]);
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

pub const WIDTH: u32 = 320;
pub const HEIGHT: u32 = 240;

/// Palm rectangle, inclusive pixel bounds: (x0, x1, y0, y1).
const PALM: (f64, f64, f64, f64) = (90.0, 230.0, 140.0, 220.0);

/// Fingers as (x0, x1, tip_y); each runs from its tip down to the palm.
/// Tips are arched so every finger contributes a hull vertex.
const FINGERS: [(f64, f64, f64); 5] = [
    (91.0, 109.0, 84.0),
    (121.0, 139.0, 62.0),
    (151.0, 169.0, 54.0),
    (181.0, 199.0, 62.0),
    (211.0, 229.0, 84.0),
];

/// Point the hand is scaled about.
const HAND_PIVOT: (f64, f64) = (160.0, 140.0);

pub fn paint(width: u32, height: u32, inside: impl Fn(f64, f64) -> bool) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if inside(x as f64, y as f64) {
            SKIN
        } else {
            BACKGROUND
        }
    })
}

pub fn blank_image() -> RgbImage {
    RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND)
}

pub fn disk_image(cx: f64, cy: f64, radius: f64) -> RgbImage {
    paint(WIDTH, HEIGHT, |x, y| {
        (x - cx).powi(2) + (y - cy).powi(2) <= radius * radius
    })
}

/// Filled disk of area ~10000 px² in the lower half of the frame.
pub fn fist_image() -> RgbImage {
    disk_image(160.0, 160.0, (10_000.0 / std::f64::consts::PI).sqrt())
}

fn in_hand(x: f64, y: f64) -> bool {
    let (px0, px1, py0, py1) = PALM;
    if x >= px0 && x <= px1 && y >= py0 && y <= py1 {
        return true;
    }
    FINGERS
        .iter()
        .any(|&(x0, x1, tip)| x >= x0 && x <= x1 && y >= tip && y < py0)
}

/// Open hand with five spread fingers, scaled about a fixed pivot.
pub fn hand_image(scale: f64) -> RgbImage {
    let (cx, cy) = HAND_PIVOT;
    paint(WIDTH, HEIGHT, |x, y| {
        in_hand(cx + (x - cx) / scale, cy + (y - cy) / scale)
    })
}

pub fn frame(image: RgbImage) -> Frame {
    Frame::from_rgb_image(image, 0)
}
