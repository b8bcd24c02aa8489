use image::RgbImage;

use crate::segmentation::domain::mask::Mask;
use crate::shared::config::ProcessorConfig;
use crate::vision::domain::vision_primitives::VisionPrimitives;

/// Thresholds a frame in YCrCb space into a skin-colored foreground mask.
///
/// Steps: downscale to the analysis size, blur, convert to YCrCb, keep
/// pixels inside `[lower, upper]`, open to drop specks, then close with a
/// larger element to fill gaps inside the silhouette.
pub struct SkinMaskBuilder {
    analysis_width: u32,
    analysis_height: u32,
    blur_sigma: f32,
    lower: [u8; 3],
    upper: [u8; 3],
    open_radius: u8,
    close_radius: u8,
}

impl SkinMaskBuilder {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            analysis_width: config.analysis_width,
            analysis_height: config.analysis_height,
            blur_sigma: config.blur_sigma,
            lower: config.skin_lower,
            upper: config.skin_upper,
            open_radius: config.open_radius,
            close_radius: config.close_radius,
        }
    }

    pub fn build(&self, vision: &dyn VisionPrimitives, frame: &RgbImage) -> Mask {
        let small = vision.resize(frame, self.analysis_width, self.analysis_height);
        let blurred = vision.gaussian_blur(&small, self.blur_sigma);
        let ycrcb = vision.to_ycrcb(&blurred);
        let raw = vision.in_range(&ycrcb, self.lower, self.upper);
        let opened = vision.open(&raw, self.open_radius);
        Mask::new(vision.close(&opened, self.close_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use crate::vision::infrastructure::imageproc_primitives::ImageprocPrimitives;
    use image::Rgb;

    fn builder() -> SkinMaskBuilder {
        SkinMaskBuilder::new(&ProcessorConfig::default())
    }

    #[test]
    fn test_mask_has_analysis_dimensions() {
        let frame = RgbImage::from_pixel(640, 480, test_support::BACKGROUND);
        let mask = builder().build(&ImageprocPrimitives::new(), &frame);
        assert_eq!((mask.width(), mask.height()), (320, 240));
    }

    #[test]
    fn test_black_frame_has_no_foreground() {
        let mask = builder().build(&ImageprocPrimitives::new(), &test_support::blank_image());
        assert!(mask.is_blank());
    }

    #[test]
    fn test_white_frame_has_no_foreground() {
        let frame = RgbImage::from_pixel(320, 240, Rgb([255, 255, 255]));
        let mask = builder().build(&ImageprocPrimitives::new(), &frame);
        assert!(mask.is_blank());
    }

    #[test]
    fn test_skin_disk_becomes_foreground() {
        let frame = test_support::disk_image(160.0, 120.0, 40.0);
        let mask = builder().build(&ImageprocPrimitives::new(), &frame);
        assert_eq!(mask.image().get_pixel(160, 120).0, [255]);
        assert_eq!(mask.image().get_pixel(10, 10).0, [0]);
        let area = std::f64::consts::PI * 40.0 * 40.0;
        let count = mask.foreground_count() as f64;
        assert!((count - area).abs() / area < 0.1, "count {count}");
    }

    #[test]
    fn test_isolated_speck_is_removed() {
        let mut frame = test_support::blank_image();
        frame.put_pixel(50, 50, test_support::SKIN);
        let mask = builder().build(&ImageprocPrimitives::new(), &frame);
        assert!(mask.is_blank());
    }

    #[test]
    fn test_downscaled_frame_keeps_shape_position() {
        let frame = test_support::paint(640, 480, |x, y| {
            (x - 320.0).powi(2) + (y - 360.0).powi(2) <= 80.0 * 80.0
        });
        let mask = builder().build(&ImageprocPrimitives::new(), &frame);
        assert_eq!(mask.image().get_pixel(160, 180).0, [255]);
        assert_eq!(mask.image().get_pixel(160, 60).0, [0]);
    }
}
