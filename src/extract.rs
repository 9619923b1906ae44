//! Extraction of one frame range to disk.
//!
//! An [`ExtractionTask`] is the unit of work handed to a worker. It opens its
//! own codec session, so tasks for the same video can run concurrently
//! without sharing any decoder state.

use std::path::{Path, PathBuf};

use crate::{
    codec::{VideoCodec, VideoSession},
    config::OutputFormat,
    error::ExtractError,
    partition::FrameRange,
    progress::CancellationToken,
};

/// Output file name for a global frame index, e.g. `0000000042.jpg`.
pub fn frame_file_name(frame_index: u64, format: OutputFormat) -> String {
    format!("{frame_index:010}.{}", format.extension())
}

/// A request to extract one frame range of one video.
#[derive(Debug, Clone)]
pub struct ExtractionTask {
    /// Video to read.
    pub video: PathBuf,
    /// Per-video output directory; must already exist.
    pub output_dir: PathBuf,
    /// Global frame indices this task owns.
    pub range: FrameRange,
    /// Sampling stride shared by every task of the video.
    pub stride: u64,
    /// Rewrite frames whose file already exists.
    pub overwrite: bool,
    /// Image format of written frames.
    pub format: OutputFormat,
}

impl ExtractionTask {
    /// Path of the output file for `frame_index`.
    pub fn frame_path(&self, frame_index: u64) -> PathBuf {
        self.output_dir.join(frame_file_name(frame_index, self.format))
    }

    /// Run the task and return how many frames were written.
    ///
    /// Frames are read from `range.start` up to (not including) `range.end`.
    /// A stream that ends early is not an error: the task simply stops.
    /// Frame `i` is written when `i % stride == 0` and its file is missing
    /// or `overwrite` is set; skipped frames are not counted and are
    /// advanced over with [`VideoSession::skip_next`].
    ///
    /// # Errors
    ///
    /// Returns the codec's open/seek/decode errors, image write errors, or
    /// [`ExtractError::Cancelled`] if `cancellation` fires between reads.
    pub fn run<C: VideoCodec>(
        &self,
        codec: &C,
        cancellation: Option<&CancellationToken>,
    ) -> Result<u64, ExtractError> {
        let stride = self.stride.max(1);
        if self.range.sampled_count(stride) == 0 {
            return Ok(0);
        }

        let mut session = codec.open(&self.video)?;
        session.seek(self.range.start)?;

        let image_format = self.format.to_image_format();
        let mut saved = 0;

        for frame_index in self.range.indices() {
            if cancellation.is_some_and(CancellationToken::is_cancelled) {
                return Err(ExtractError::Cancelled);
            }

            let path = (frame_index % stride == 0)
                .then(|| self.frame_path(frame_index))
                .filter(|path| self.overwrite || !path.exists());

            let Some(path) = path else {
                if !session.skip_next()? {
                    self.log_short_stream(frame_index);
                    break;
                }
                continue;
            };

            let Some(image) = session.read_next()? else {
                self.log_short_stream(frame_index);
                break;
            };

            image.save_with_format(&path, image_format)?;
            saved += 1;
        }

        Ok(saved)
    }

    fn log_short_stream(&self, frame_index: u64) {
        log::debug!(
            "{}: stream ended at frame {frame_index}, before {}",
            self.video.display(),
            self.range.end
        );
    }
}

/// Extract `range` of `video` into `output_dir`, returning frames written.
///
/// Convenience wrapper around [`ExtractionTask::run`] without cancellation.
pub fn extract_range<C: VideoCodec>(
    codec: &C,
    video: &Path,
    output_dir: &Path,
    range: FrameRange,
    stride: u64,
    overwrite: bool,
    format: OutputFormat,
) -> Result<u64, ExtractError> {
    ExtractionTask {
        video: video.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        range,
        stride,
        overwrite,
        format,
    }
    .run(codec, None)
}
