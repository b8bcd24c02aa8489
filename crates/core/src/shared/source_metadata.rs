use std::path::PathBuf;

/// Describes an opened frame source.
///
/// `total_frames` is `None` for open-ended sources.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: Option<usize>,
    pub source_path: Option<PathBuf>,
}
