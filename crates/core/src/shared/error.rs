use std::path::PathBuf;

use thiserror::Error;

/// Conditions under which a frame is not turned into a render result.
///
/// `EmptyFrame` is the "skip frame" signal: the caller should drop the frame
/// and continue with the next one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("frame has no pixels ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("frame is not 3-channel RGB: {channels} channels, {actual} bytes (expected {expected})")]
    InvalidFrame {
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
