//! Extraction configuration.
//!
//! [`ExtractOptions`] is a builder that carries the sampling rate, execution
//! mode, overwrite policy, and operational hooks (progress, cancellation)
//! through the coordinator without widening every function signature.
//!
//! # Example
//!
//! ```
//! use framesplit::{ExtractOptions, OutputFormat, TargetFrameRate};
//!
//! let options = ExtractOptions::new()
//!     .with_target_fps(TargetFrameRate::from_cli(5)?)
//!     .with_parallel(true)
//!     .with_chunk_size(1000)
//!     .with_max_workers(4)
//!     .with_output_format(OutputFormat::Png);
//! assert_eq!(options.chunk_size(), 1000);
//! # Ok::<(), framesplit::ExtractError>(())
//! ```

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    str::FromStr,
    sync::Arc,
    thread,
};

use image::ImageFormat;

use crate::{
    error::ExtractError,
    progress::{CancellationToken, NoOpProgress, ProgressCallback},
    rate::TargetFrameRate,
};

/// Frames per chunk when none is configured.
pub const DEFAULT_CHUNK_SIZE: u64 = 500;

/// Image format of the written frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JPEG, `.jpg`. The default.
    #[default]
    Jpeg,
    /// PNG, `.png`.
    Png,
    /// Windows bitmap, `.bmp`.
    Bmp,
    /// TIFF, `.tiff`.
    Tiff,
}

impl OutputFormat {
    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    pub(crate) fn to_image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            other => Err(ExtractError::Configuration(format!(
                "unsupported image extension: {other}"
            ))),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

/// Configuration for extraction runs.
///
/// A default-constructed value extracts every frame, sequentially, as JPEG,
/// skipping files that already exist.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) target_fps: TargetFrameRate,
    pub(crate) parallel: bool,
    pub(crate) overwrite: bool,
    pub(crate) chunk_size: u64,
    pub(crate) max_workers: usize,
    pub(crate) output_format: OutputFormat,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("target_fps", &self.target_fps)
            .field("parallel", &self.parallel)
            .field("overwrite", &self.overwrite)
            .field("chunk_size", &self.chunk_size)
            .field("max_workers", &self.max_workers)
            .field("output_format", &self.output_format)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with default settings.
    ///
    /// Defaults: all frames, sequential, no overwrite, chunks of
    /// [`DEFAULT_CHUNK_SIZE`], one worker per available CPU, JPEG output.
    pub fn new() -> Self {
        Self {
            target_fps: TargetFrameRate::All,
            parallel: false,
            overwrite: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_workers: host_parallelism(),
            output_format: OutputFormat::Jpeg,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
        }
    }

    /// Set the desired output frame rate.
    #[must_use]
    pub fn with_target_fps(mut self, target_fps: TargetFrameRate) -> Self {
        self.target_fps = target_fps;
        self
    }

    /// Split each video into chunks and extract them on a worker pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rewrite frames whose output file already exists.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Frames per chunk in parallel mode. Must be non-zero.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Worker pool size in parallel mode. Must be non-zero.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Image format of the written frames.
    #[must_use]
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Attach a progress callback, fired once per finished chunk.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked between frame reads.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The configured target frame rate.
    pub fn target_fps(&self) -> TargetFrameRate {
        self.target_fps
    }

    /// Whether parallel extraction is enabled.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Whether existing frames are rewritten.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Frames per chunk.
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Worker pool size.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Output image format.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub(crate) fn validate(&self) -> Result<(), ExtractError> {
        if self.chunk_size == 0 {
            return Err(ExtractError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ExtractError::Configuration(
                "worker count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

/// Number of CPUs available to this process, at least 1.
pub fn host_parallelism() -> usize {
    thread::available_parallelism().map_or(1, |count| count.get())
}
