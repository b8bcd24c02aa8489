use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

/// Replays a still image, or every image in a directory, as a frame feed.
///
/// Directory entries are taken in lexicographic order and decoded lazily.
/// The whole sequence repeats `loops` times to stand in for a live camera.
pub struct ImageSequenceSource {
    loops: usize,
    paths: Vec<PathBuf>,
    metadata: Option<SourceMetadata>,
}

impl ImageSequenceSource {
    pub fn new(loops: usize) -> Self {
        Self {
            loops: loops.max(1),
            paths: Vec::new(),
            metadata: None,
        }
    }
}

impl Default for ImageSequenceSource {
    fn default() -> Self {
        Self::new(1)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn decode(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let image = image::open(path)
        .map_err(|e| format!("failed to decode {}: {e}", path.display()))?
        .to_rgb8();
    Ok(Frame::from_rgb_image(image, index))
}

impl FrameSource for ImageSequenceSource {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let paths = if path.is_dir() {
            list_images(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(format!("input not found: {}", path.display()).into());
        };

        let first = paths
            .first()
            .ok_or_else(|| format!("no images found in {}", path.display()))?;
        let (width, height) = image::image_dimensions(first)?;

        let metadata = SourceMetadata {
            width,
            height,
            total_frames: Some(paths.len() * self.loops),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = paths;
        self.metadata = Some(metadata.clone());
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if self.metadata.is_none() {
            return Box::new(std::iter::once(Err(
                "ImageSequenceSource: not opened".into()
            )));
        }
        let paths = &self.paths;
        Box::new(
            (0..self.loops)
                .flat_map(move |_| paths.iter())
                .enumerate()
                .map(|(index, path)| decode(path, index)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
        self.metadata = None;
    }
}
