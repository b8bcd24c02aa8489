use image::GrayImage;

/// Binary foreground mask at analysis resolution: 255 foreground, 0 background.
///
/// Built fresh for every frame and dropped once the region is selected.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask(GrayImage);

impl Mask {
    pub fn new(image: GrayImage) -> Self {
        Self(image)
    }

    pub fn image(&self) -> &GrayImage {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn foreground_count(&self) -> usize {
        self.0.as_raw().iter().filter(|&&v| v > 0).count()
    }

    pub fn is_blank(&self) -> bool {
        self.0.as_raw().iter().all(|&v| v == 0)
    }
}
