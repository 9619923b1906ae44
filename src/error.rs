//! Error types for the `framesplit` crate.
//!
//! This module defines [`ExtractError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry the video path and, for
//! worker failures, the frame range that failed, so a batch summary can be
//! printed without additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

use crate::partition::FrameRange;

/// The unified error type for all `framesplit` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// Extraction settings or probed video properties are unusable
    /// (zero target rate, non-positive native rate, zero chunk size, ...).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The video could not be opened or probed.
    #[error("Failed to open video at {path}: {reason}")]
    SourceUnreadable {
        /// Path of the video that failed to open.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A single extraction task failed. Sibling tasks still ran to
    /// completion and their output remains on disk.
    #[error("Extraction of frames {range} from {video} failed: {source}")]
    WorkerFailure {
        /// The video the task was extracting from.
        video: PathBuf,
        /// The chunk the failing task owned.
        range: FrameRange,
        /// What went wrong inside the task.
        #[source]
        source: Box<ExtractError>,
    },

    /// The per-video output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },

    /// A frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    Decode(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// A frame could not be encoded or written as an image.
    #[error("Image write error: {0}")]
    Image(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for ExtractError {
    fn from(error: FfmpegError) -> Self {
        ExtractError::Ffmpeg(error.to_string())
    }
}

impl ExtractError {
    /// The frame range of a failed worker, if this is a worker failure.
    pub fn failed_range(&self) -> Option<FrameRange> {
        match self {
            ExtractError::WorkerFailure { range, .. } => Some(*range),
            _ => None,
        }
    }
}
