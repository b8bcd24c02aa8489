//! Contrast-limited adaptive histogram equalization.
//!
//! Each tile gets its own clipped-histogram lookup table; pixels blend the
//! tables of the four nearest tile centers so tile seams do not show.

use image::{GrayImage, Luma};
use ndarray::{s, Array3, ArrayView2};

const LEVELS: usize = 256;

pub fn equalize_adaptive(image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let shape = (height as usize, width as usize);
    let Ok(view) = ArrayView2::from_shape(shape, image.as_raw().as_slice()) else {
        return image.clone();
    };

    let (tile_w, tiles_x) = tile_layout(width as usize, tiles.max(1) as usize);
    let (tile_h, tiles_y) = tile_layout(height as usize, tiles.max(1) as usize);

    let mut luts = Array3::<u8>::zeros((tiles_y, tiles_x, LEVELS));
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let y0 = ty * tile_h;
            let x0 = tx * tile_w;
            let y1 = (y0 + tile_h).min(height as usize);
            let x1 = (x0 + tile_w).min(width as usize);
            let tile = view.slice(s![y0..y1, x0..x1]);

            let mut hist = [0u32; LEVELS];
            for &v in tile.iter() {
                hist[v as usize] += 1;
            }
            let lut = clipped_lut(&mut hist, tile.len() as u32, clip_limit);
            luts.slice_mut(s![ty, tx, ..])
                .iter_mut()
                .zip(lut.iter())
                .for_each(|(dst, &src)| *dst = src);
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let v = view[[y as usize, x as usize]] as usize;
        let (ty0, ty1, wy) = neighbours(y as usize, tile_h, tiles_y);
        let (tx0, tx1, wx) = neighbours(x as usize, tile_w, tiles_x);

        let top = (1.0 - wx) * luts[[ty0, tx0, v]] as f32 + wx * luts[[ty0, tx1, v]] as f32;
        let bottom = (1.0 - wx) * luts[[ty1, tx0, v]] as f32 + wx * luts[[ty1, tx1, v]] as f32;
        let blended = (1.0 - wy) * top + wy * bottom;
        Luma([blended.round().clamp(0.0, 255.0) as u8])
    })
}

/// Tile size and the number of non-empty tiles along one axis.
fn tile_layout(len: usize, requested: usize) -> (usize, usize) {
    let count = requested.min(len).max(1);
    let size = len.div_ceil(count);
    (size, len.div_ceil(size))
}

/// The two tiles whose centers bracket `pos`, and the weight of the second.
fn neighbours(pos: usize, tile: usize, count: usize) -> (usize, usize, f32) {
    let f = (pos as f32 + 0.5) / tile as f32 - 0.5;
    let i0 = (f.floor().max(0.0) as usize).min(count - 1);
    let i1 = (i0 + 1).min(count - 1);
    let w = if i1 == i0 {
        0.0
    } else {
        (f - i0 as f32).clamp(0.0, 1.0)
    };
    (i0, i1, w)
}

/// Clips the histogram, spreads the excess evenly and returns the CDF table.
fn clipped_lut(hist: &mut [u32; LEVELS], count: u32, clip_limit: f32) -> [u8; LEVELS] {
    let mut lut = [0u8; LEVELS];
    if count == 0 {
        return lut;
    }

    if clip_limit > 0.0 {
        let limit = ((clip_limit * count as f32 / LEVELS as f32) as u32).max(1);
        let mut excess = 0u32;
        for h in hist.iter_mut() {
            if *h > limit {
                excess += *h - limit;
                *h = limit;
            }
        }
        let share = excess / LEVELS as u32;
        let remainder = (excess % LEVELS as u32) as usize;
        for (i, h) in hist.iter_mut().enumerate() {
            *h += share + u32::from(i < remainder);
        }
    }

    let mut cdf = 0u32;
    for (i, h) in hist.iter().enumerate() {
        cdf += h;
        lut[i] = ((cdf as f32 * 255.0 / count as f32).round()).min(255.0) as u8;
    }
    lut
}
