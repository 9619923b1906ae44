//! Per-video extraction coordinator.
//!
//! [`Coordinator::process_video`] probes a video, plans its sampling stride,
//! splits it into chunks, and runs one [`ExtractionTask`] per chunk, either
//! inline or on a dedicated rayon pool. Every task result is observed: a
//! failing chunk never hides behind its siblings, and siblings still finish
//! and keep their output on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::{
    ThreadPool, ThreadPoolBuilder,
    iter::{IntoParallelRefIterator, ParallelIterator},
};

use crate::{
    codec::{VideoCodec, VideoSession},
    config::ExtractOptions,
    error::ExtractError,
    extract::ExtractionTask,
    partition::{FrameRange, partition},
    progress::ProgressTracker,
    rate::sampling_stride,
};

/// The result of extracting one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOutput {
    /// The input video.
    pub video: PathBuf,
    /// Directory holding the extracted frames.
    pub directory: PathBuf,
    /// Frame count reported by the codec.
    pub total_frames: u64,
    /// Native frame rate reported by the codec.
    pub native_fps: f64,
    /// Sampling stride that was applied.
    pub stride: u64,
    /// Number of extraction tasks that ran.
    pub chunks: usize,
    /// Frames written during this run. Existing files that were skipped do
    /// not count.
    pub frames_saved: u64,
}

/// Drives extraction of videos with a given codec and options.
///
/// # Example
///
/// ```no_run
/// use framesplit::{Coordinator, ExtractOptions, FfmpegCodec, TargetFrameRate};
///
/// let options = ExtractOptions::new()
///     .with_target_fps(TargetFrameRate::from_cli(2)?)
///     .with_parallel(true);
/// let coordinator = Coordinator::new(FfmpegCodec::new(), options)?;
/// let output = coordinator.process_video("clips/intro.mp4", "frames")?;
/// println!("{} frames in {}", output.frames_saved, output.directory.display());
/// # Ok::<(), framesplit::ExtractError>(())
/// ```
pub struct Coordinator<C> {
    codec: C,
    options: ExtractOptions,
    pool: Option<ThreadPool>,
}

impl<C: VideoCodec> Coordinator<C> {
    /// Validate `options` and, in parallel mode, build a worker pool of
    /// `options.max_workers()` threads.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Configuration`] for a zero chunk size or
    /// worker count, or if the pool cannot be created.
    pub fn new(codec: C, options: ExtractOptions) -> Result<Self, ExtractError> {
        options.validate()?;

        let pool = if options.parallel {
            let pool = ThreadPoolBuilder::new()
                .num_threads(options.max_workers)
                .thread_name(|index| format!("framesplit-worker-{index}"))
                .build()
                .map_err(|error| {
                    ExtractError::Configuration(format!("failed to start worker pool: {error}"))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            codec,
            options,
            pool,
        })
    }

    /// The options this coordinator runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// The codec this coordinator opens videos with.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Extract the frames of `video` into `output_root/<video file name>/`.
    ///
    /// The output directory is created if missing. In sequential mode the
    /// whole video is one task; in parallel mode it is split into chunks of
    /// `chunk_size` frames and the call returns once every chunk finished.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::DirectoryCreation`] if the output directory cannot
    ///   be created.
    /// - [`ExtractError::SourceUnreadable`] if the video cannot be probed.
    /// - [`ExtractError::Configuration`] if the target rate cannot be applied
    ///   to the video's native rate.
    /// - [`ExtractError::WorkerFailure`] for the first failing chunk (lowest
    ///   start frame), after all chunks have been attempted.
    /// - [`ExtractError::Cancelled`] if cancellation was requested.
    pub fn process_video(
        &self,
        video: impl AsRef<Path>,
        output_root: impl AsRef<Path>,
    ) -> Result<VideoOutput, ExtractError> {
        let video = video.as_ref();
        let file_name = video.file_name().ok_or_else(|| ExtractError::SourceUnreadable {
            path: video.to_path_buf(),
            reason: "path has no file name".to_string(),
        })?;

        let directory = output_root.as_ref().join(file_name);
        fs::create_dir_all(&directory).map_err(|source| ExtractError::DirectoryCreation {
            path: directory.clone(),
            source,
        })?;

        let (total_frames, native_fps) = self.probe(video)?;
        let stride = sampling_stride(native_fps, self.options.target_fps).map_err(|error| {
            match error {
                ExtractError::Configuration(reason) => {
                    ExtractError::Configuration(format!("{}: {reason}", video.display()))
                }
                other => other,
            }
        })?;

        let ranges = if self.pool.is_some() {
            partition(total_frames, self.options.chunk_size)?
        } else {
            vec![FrameRange::new(0, total_frames)]
        };

        log::info!(
            "Extracting {} ({total_frames} frames @ {native_fps:.3} fps, stride {stride}, {} chunk(s))",
            video.display(),
            ranges.len()
        );

        let tasks: Vec<ExtractionTask> = ranges
            .into_iter()
            .map(|range| ExtractionTask {
                video: video.to_path_buf(),
                output_dir: directory.clone(),
                range,
                stride,
                overwrite: self.options.overwrite,
                format: self.options.output_format,
            })
            .collect();

        let tracker = ProgressTracker::new(self.options.progress.clone(), video, tasks.len() as u64);
        let run = |task: &ExtractionTask| (task.range, self.run_task(task, &tracker));

        let results: Vec<(FrameRange, Result<u64, ExtractError>)> = match &self.pool {
            Some(pool) => pool.install(|| tasks.par_iter().map(run).collect()),
            None => tasks.iter().map(run).collect(),
        };

        let frames_saved = collect_results(video, results)?;
        log::info!("Saved {frames_saved} frame(s) to {}", directory.display());

        Ok(VideoOutput {
            video: video.to_path_buf(),
            directory,
            total_frames,
            native_fps,
            stride,
            chunks: tasks.len(),
            frames_saved,
        })
    }

    /// Read frame count and rate, releasing the session before returning.
    fn probe(&self, video: &Path) -> Result<(u64, f64), ExtractError> {
        let session = self.codec.open(video)?;
        Ok((session.total_frame_count(), session.native_fps()))
    }

    fn run_task(
        &self,
        task: &ExtractionTask,
        tracker: &ProgressTracker,
    ) -> Result<u64, ExtractError> {
        if self.options.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        log::debug!("{}: extracting chunk {}", task.video.display(), task.range);
        let result = task.run(&self.codec, self.options.cancellation.as_ref());
        tracker.chunk_finished(*result.as_ref().unwrap_or(&0));
        result
    }
}

/// Sum the saved counts, or surface the first failure once every result is
/// in. Results arrive in chunk order.
fn collect_results(
    video: &Path,
    results: Vec<(FrameRange, Result<u64, ExtractError>)>,
) -> Result<u64, ExtractError> {
    let mut frames_saved = 0;
    let mut cancelled = false;
    let mut failures = Vec::new();

    for (range, result) in results {
        match result {
            Ok(saved) => frames_saved += saved,
            Err(ExtractError::Cancelled) => cancelled = true,
            Err(error) => failures.push((range, error)),
        }
    }

    if cancelled {
        return Err(ExtractError::Cancelled);
    }

    let mut failures = failures.into_iter();
    let Some((range, error)) = failures.next() else {
        return Ok(frames_saved);
    };

    for (other_range, other_error) in failures {
        log::warn!(
            "{}: chunk {other_range} also failed: {other_error}",
            video.display()
        );
    }
    log::warn!(
        "{}: {frames_saved} frame(s) saved by the chunks that succeeded",
        video.display()
    );

    Err(ExtractError::WorkerFailure {
        video: video.to_path_buf(),
        range,
        source: Box::new(error),
    })
}
