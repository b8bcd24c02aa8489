use image::{GrayImage, RgbImage};

use crate::shared::geometry::{BoundingBox, ConvexityDefect, Moments, Point};

/// A traced boundary of one connected foreground blob.
pub type Contour = Vec<Point>;

/// Port to the image-processing library the pipeline is built on.
///
/// The pipeline only decides how these results are combined and
/// interpreted; implementations own the pixel-level algorithms. All
/// operations return fresh images and never mutate their inputs.
pub trait VisionPrimitives: Send + Sync {
    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> RgbImage;

    fn gaussian_blur(&self, image: &RgbImage, sigma: f32) -> RgbImage;

    /// Converts RGB to (Y, Cr, Cb) stored in the three channels, in that order.
    fn to_ycrcb(&self, image: &RgbImage) -> RgbImage;

    /// Foreground (255) where every channel lies within `[lower, upper]`.
    fn in_range(&self, image: &RgbImage, lower: [u8; 3], upper: [u8; 3]) -> GrayImage;

    /// Erode then dilate with a square element of the given radius.
    fn open(&self, mask: &GrayImage, radius: u8) -> GrayImage;

    /// Dilate then erode with a square element of the given radius.
    fn close(&self, mask: &GrayImage, radius: u8) -> GrayImage;

    /// All outer and hole boundaries, with collinear runs compressed.
    fn find_contours(&self, mask: &GrayImage) -> Vec<Contour>;

    /// Unsigned enclosed area of a closed polygon.
    fn contour_area(&self, contour: &[Point]) -> f64;

    /// Perimeter of a closed polygon.
    fn arc_length(&self, contour: &[Point]) -> f64;

    fn bounding_rect(&self, contour: &[Point]) -> BoundingBox;

    fn moments(&self, contour: &[Point]) -> Moments;

    /// Indices of hull vertices in ascending contour order.
    fn convex_hull(&self, contour: &[Point]) -> Vec<usize>;

    /// `None` when the hull is too degenerate to define defects.
    fn convexity_defects(
        &self,
        contour: &[Point],
        hull: &[usize],
    ) -> Option<Vec<ConvexityDefect>>;

    fn to_grayscale(&self, image: &RgbImage) -> GrayImage;

    /// Contrast-limited adaptive histogram equalization over a `tiles` x `tiles` grid.
    fn equalize_adaptive(&self, image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage;
}
