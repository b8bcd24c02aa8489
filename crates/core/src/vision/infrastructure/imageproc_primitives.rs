use image::imageops::FilterType;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::point::Point as ImPoint;

use crate::shared::geometry::{BoundingBox, ConvexityDefect, Moments, Point};
use crate::vision::domain::vision_primitives::{Contour, VisionPrimitives};
use crate::vision::infrastructure::{clahe, convexity, polygon_math};

/// [`VisionPrimitives`] backed by the `image` and `imageproc` crates.
///
/// Morphology uses square (L-infinity) structuring elements, so a radius of
/// `r` corresponds to a `(2r+1) x (2r+1)` kernel.
pub struct ImageprocPrimitives;

impl ImageprocPrimitives {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageprocPrimitives {
    fn default() -> Self {
        Self::new()
    }
}

fn to_imageproc(contour: &[Point]) -> Vec<ImPoint<i32>> {
    contour.iter().map(|p| ImPoint::new(p.x, p.y)).collect()
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl VisionPrimitives for ImageprocPrimitives {
    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> RgbImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        image::imageops::resize(image, width, height, FilterType::Triangle)
    }

    fn gaussian_blur(&self, image: &RgbImage, sigma: f32) -> RgbImage {
        if sigma <= 0.0 {
            return image.clone();
        }
        imageproc::filter::gaussian_blur_f32(image, sigma)
    }

    fn to_ycrcb(&self, image: &RgbImage) -> RgbImage {
        RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b] = image.get_pixel(x, y).0;
            let (r, g, b) = (r as f32, g as f32, b as f32);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            let cr = (r - luma) * 0.713 + 128.0;
            let cb = (b - luma) * 0.564 + 128.0;
            Rgb([clamp_u8(luma), clamp_u8(cr), clamp_u8(cb)])
        })
    }

    fn in_range(&self, image: &RgbImage, lower: [u8; 3], upper: [u8; 3]) -> GrayImage {
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let px = image.get_pixel(x, y).0;
            let inside = (0..3).all(|c| px[c] >= lower[c] && px[c] <= upper[c]);
            Luma([if inside { 255 } else { 0 }])
        })
    }

    fn open(&self, mask: &GrayImage, radius: u8) -> GrayImage {
        if radius == 0 {
            return mask.clone();
        }
        imageproc::morphology::open(mask, Norm::LInf, radius)
    }

    fn close(&self, mask: &GrayImage, radius: u8) -> GrayImage {
        if radius == 0 {
            return mask.clone();
        }
        imageproc::morphology::close(mask, Norm::LInf, radius)
    }

    fn find_contours(&self, mask: &GrayImage) -> Vec<Contour> {
        // imageproc only opens an outer border next to a background pixel,
        // so blobs touching the frame edge need a background margin.
        let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
        image::imageops::replace(&mut padded, mask, 1, 1);

        imageproc::contours::find_contours::<i32>(&padded)
            .into_iter()
            .filter(|c| !c.points.is_empty())
            .map(|c| {
                let points: Vec<Point> = c
                    .points
                    .iter()
                    .map(|p| Point::new(p.x - 1, p.y - 1))
                    .collect();
                polygon_math::compress_collinear(&points)
            })
            .collect()
    }

    fn contour_area(&self, contour: &[Point]) -> f64 {
        imageproc::geometry::contour_area(&to_imageproc(contour))
    }

    fn arc_length(&self, contour: &[Point]) -> f64 {
        if contour.len() < 2 {
            return 0.0;
        }
        imageproc::geometry::arc_length(&to_imageproc(contour), true)
    }

    fn bounding_rect(&self, contour: &[Point]) -> BoundingBox {
        polygon_math::bounding_box(contour)
    }

    fn moments(&self, contour: &[Point]) -> Moments {
        polygon_math::polygon_moments(contour)
    }

    fn convex_hull(&self, contour: &[Point]) -> Vec<usize> {
        if contour.len() < 3 {
            return (0..contour.len()).collect();
        }
        let points = to_imageproc(contour);
        let hull: Vec<Point> = imageproc::geometry::convex_hull(points.as_slice())
            .into_iter()
            .map(|p| Point::new(p.x, p.y))
            .collect();
        convexity::hull_indices(contour, &hull)
    }

    fn convexity_defects(
        &self,
        contour: &[Point],
        hull: &[usize],
    ) -> Option<Vec<ConvexityDefect>> {
        convexity::convexity_defects(contour, hull)
    }

    fn to_grayscale(&self, image: &RgbImage) -> GrayImage {
        image::imageops::grayscale(image)
    }

    fn equalize_adaptive(&self, image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
        clahe::equalize_adaptive(image, clip_limit, tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn filled_rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            let inside = x >= x0 && x <= x1 && y >= y0 && y <= y1;
            Luma([if inside { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_resize_to_requested_size() {
        let img = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let out = ImageprocPrimitives::new().resize(&img, 32, 24);
        assert_eq!(out.dimensions(), (32, 24));
        assert_eq!(out.get_pixel(5, 5).0, [10, 20, 30]);
    }

    #[test]
    fn test_blur_with_zero_sigma_is_identity() {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 0]));
        let out = ImageprocPrimitives::new().gaussian_blur(&img, 0.0);
        assert_eq!(out, img);
    }

    #[test]
    fn test_ycrcb_of_skin_tone() {
        let img = RgbImage::from_pixel(1, 1, Rgb([220, 160, 130]));
        let [y, cr, cb] = ImageprocPrimitives::new().to_ycrcb(&img).get_pixel(0, 0).0;
        assert!((y as i32 - 175).abs() <= 1);
        assert!((cr as i32 - 160).abs() <= 1);
        assert!((cb as i32 - 103).abs() <= 1);
    }

    #[test]
    fn test_ycrcb_of_gray_is_neutral_chroma() {
        let img = RgbImage::from_pixel(1, 1, Rgb([90, 90, 90]));
        let [y, cr, cb] = ImageprocPrimitives::new().to_ycrcb(&img).get_pixel(0, 0).0;
        assert_eq!((y, cr, cb), (90, 128, 128));
    }

    #[test]
    fn test_in_range_is_inclusive() {
        // Cr = 133, 154, 175: lower bound, inside, above the upper bound
        let img = RgbImage::from_fn(3, 1, |x, _| Rgb([0, 133 + x as u8 * 21, 100]));
        let mask = ImageprocPrimitives::new().in_range(&img, [0, 133, 77], [255, 173, 127]);
        assert_eq!(mask.get_pixel(0, 0).0, [255]);
        assert_eq!(mask.get_pixel(1, 0).0, [255]);
        assert_eq!(mask.get_pixel(2, 0).0, [0]);
    }

    #[test]
    fn test_open_removes_isolated_speck() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(5, 5, Luma([255]));
        let out = ImageprocPrimitives::new().open(&mask, 1);
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_close_fills_small_hole() {
        let mut mask = filled_rect_mask(20, 20, 2, 2, 17, 17);
        mask.put_pixel(10, 10, Luma([0]));
        let out = ImageprocPrimitives::new().close(&mask, 1);
        assert_eq!(out.get_pixel(10, 10).0, [255]);
    }

    #[test]
    fn test_find_contours_of_rectangle() {
        let mask = filled_rect_mask(40, 30, 10, 10, 29, 19);
        let prims = ImageprocPrimitives::new();
        let contours = prims.find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        assert_relative_eq!(prims.contour_area(&contours[0]), 19.0 * 9.0);
        assert_relative_eq!(prims.arc_length(&contours[0]), 2.0 * (19.0 + 9.0));
    }

    #[test]
    fn test_find_contours_of_mask_touching_every_edge() {
        let mask = GrayImage::from_pixel(20, 10, Luma([255]));
        let prims = ImageprocPrimitives::new();
        let contours = prims.find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        for corner in [(0, 0), (19, 0), (19, 9), (0, 9)] {
            assert!(contours[0].contains(&Point::new(corner.0, corner.1)));
        }
        assert_relative_eq!(prims.contour_area(&contours[0]), 19.0 * 9.0);
    }

    #[test]
    fn test_full_mask_with_hole_keeps_outer_border_largest() {
        let mut mask = GrayImage::from_pixel(40, 30, Luma([255]));
        for y in 10..20 {
            for x in 10..20 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let prims = ImageprocPrimitives::new();
        let areas: Vec<f64> = prims
            .find_contours(&mask)
            .iter()
            .map(|c| prims.contour_area(c))
            .collect();
        assert_eq!(areas.len(), 2);
        let largest = areas.iter().copied().fold(0.0, f64::max);
        assert_relative_eq!(largest, 39.0 * 29.0);
    }

    #[test]
    fn test_find_contours_of_empty_mask() {
        let mask = GrayImage::new(16, 16);
        assert!(ImageprocPrimitives::new().find_contours(&mask).is_empty());
    }

    #[test]
    fn test_convex_hull_of_rectangle_keeps_all_corners() {
        let contour = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 5),
            Point::new(0, 5),
        ];
        let hull = ImageprocPrimitives::new().convex_hull(&contour);
        assert_eq!(hull, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_convex_hull_of_tiny_contour() {
        let contour = vec![Point::new(1, 1), Point::new(2, 2)];
        assert_eq!(ImageprocPrimitives::new().convex_hull(&contour), vec![0, 1]);
    }

    #[test]
    fn test_grayscale_dimensions() {
        let img = RgbImage::from_pixel(7, 3, Rgb([255, 255, 255]));
        let gray = ImageprocPrimitives::new().to_grayscale(&img);
        assert_eq!(gray.dimensions(), (7, 3));
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
    }
}
