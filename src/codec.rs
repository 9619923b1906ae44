//! The video codec seam.
//!
//! Extraction only needs a handful of operations from a decoder: open a
//! file, report its frame count and frame rate, seek to a frame index, and
//! pull frames one after another. [`VideoCodec`] and [`VideoSession`]
//! capture exactly that, so the coordinator can run against
//! [`FfmpegCodec`](crate::FfmpegCodec) in production and against synthetic
//! sources in tests.

use std::path::Path;

use image::DynamicImage;

use crate::error::ExtractError;

/// Opens independent decoding sessions for video files.
///
/// The codec itself is shared by every worker thread, so it must be
/// [`Send`] and [`Sync`]. Sessions are created and dropped inside a single
/// worker and need neither.
pub trait VideoCodec: Send + Sync {
    /// The session type produced by [`open`](VideoCodec::open).
    type Session: VideoSession;

    /// Open a new decoding session positioned at the first frame.
    ///
    /// # Errors
    ///
    /// Implementations return [`ExtractError::SourceUnreadable`] when the
    /// file cannot be opened or has no decodable video stream.
    fn open(&self, path: &Path) -> Result<Self::Session, ExtractError>;
}

/// A single open video, read sequentially.
///
/// Dropping the session releases the underlying decoder and file handle.
pub trait VideoSession {
    /// Total number of frames the container reports.
    fn total_frame_count(&self) -> u64;

    /// Native frame rate in frames per second. May be `0.0` when the
    /// container does not report one.
    fn native_fps(&self) -> f64;

    /// Position the session so the next [`read_next`](VideoSession::read_next)
    /// returns frame `frame_index`.
    fn seek(&mut self, frame_index: u64) -> Result<(), ExtractError>;

    /// Decode the next frame. `Ok(None)` means the stream ended.
    fn read_next(&mut self) -> Result<Option<DynamicImage>, ExtractError>;

    /// Advance past the next frame without producing an image. Returns
    /// `false` if the stream already ended.
    ///
    /// Implementations that convert pixels on read should override this.
    fn skip_next(&mut self) -> Result<bool, ExtractError> {
        Ok(self.read_next()?.is_some())
    }
}
