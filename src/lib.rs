//! # framesplit
//!
//! Split video files into numbered still frames at a configurable sampling
//! rate, optionally spreading the work over a pool of worker threads.
//!
//! Each video is written to `output_root/<video file name>/`, one image per
//! kept frame, named by the frame's global index zero-padded to 10 digits
//! (`0000000000.jpg`, `0000000030.jpg`, ...). Reruns skip frames that are
//! already on disk unless overwriting is requested.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framesplit::{Coordinator, ExtractOptions, FfmpegCodec, TargetFrameRate, discover_videos};
//!
//! let options = ExtractOptions::new()
//!     .with_target_fps(TargetFrameRate::from_cli(1)?)
//!     .with_parallel(true);
//! let coordinator = Coordinator::new(FfmpegCodec::new(), options)?;
//!
//! let videos = discover_videos("samples")?;
//! let report = coordinator.process_batch(&videos, "output");
//! println!("{} frames, {} failures", report.frames_saved(), report.failures.len());
//! # Ok::<(), framesplit::ExtractError>(())
//! ```
//!
//! ## How extraction is split
//!
//! - The sampling stride is `ceil(native_fps / target_fps)` (or 1 for all
//!   frames) and applies to global frame indices, so chunking never changes
//!   which frames are kept.
//! - In parallel mode `[0, total_frames)` is cut into half-open chunks of
//!   `chunk_size` frames; each chunk opens its own decoder.
//! - Every chunk's result is collected. The first failing chunk is returned
//!   as [`ExtractError::WorkerFailure`] only after all chunks finished.
//!
//! Decoding goes through the [`VideoCodec`] trait; [`FfmpegCodec`] is the
//! FFmpeg-backed implementation and requires the FFmpeg development
//! libraries to be installed.

pub mod batch;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod partition;
pub mod progress;
pub mod rate;

pub use batch::{BatchReport, discover_videos};
pub use codec::{VideoCodec, VideoSession};
pub use config::{DEFAULT_CHUNK_SIZE, ExtractOptions, OutputFormat, host_parallelism};
pub use coordinator::{Coordinator, VideoOutput};
pub use error::ExtractError;
pub use extract::{ExtractionTask, extract_range, frame_file_name};
pub use ffmpeg::{FfmpegCodec, FfmpegLogLevel, FfmpegSession, set_ffmpeg_log_level};
pub use partition::{FrameRange, partition};
pub use progress::{CancellationToken, ProgressCallback, ProgressInfo};
pub use rate::{ALL_FRAMES_SENTINEL, TargetFrameRate, sampling_stride};
