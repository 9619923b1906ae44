//! Progress reporting and cancellation support.
//!
//! [`ProgressCallback`] receives a [`ProgressInfo`] snapshot each time an
//! extraction chunk finishes; [`CancellationToken`] lets another thread stop
//! a running extraction between frame reads.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framesplit::{Coordinator, ExtractOptions, FfmpegCodec, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}: {:.0}%", info.video.display(), info.percentage());
//!     }
//! }
//!
//! let options = ExtractOptions::new()
//!     .with_parallel(true)
//!     .with_progress(Arc::new(PrintProgress));
//! let coordinator = Coordinator::new(FfmpegCodec::new(), options)?;
//! coordinator.process_video("input.mp4", "frames")?;
//! # Ok::<(), framesplit::ExtractError>(())
//! ```

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// A snapshot of extraction progress for one video.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// The video being extracted.
    pub video: PathBuf,
    /// Chunks that have finished (successfully or not).
    pub chunks_completed: u64,
    /// Chunks scheduled for this video.
    pub chunks_total: u64,
    /// Frames written so far across all finished chunks.
    pub frames_saved: u64,
    /// Wall-clock time since extraction of this video started.
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// Completion percentage (0.0 – 100.0).
    pub fn percentage(&self) -> f32 {
        if self.chunks_total == 0 {
            return 100.0;
        }
        self.chunks_completed as f32 / self.chunks_total as f32 * 100.0
    }
}

/// Trait for receiving progress updates during extraction.
///
/// Callbacks are invoked from worker threads, hence the [`Send`] and
/// [`Sync`] bounds. They observe but cannot halt the operation; use
/// [`CancellationToken`] for that.
pub trait ProgressCallback: Send + Sync {
    /// Called once per finished chunk.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state; cancelling any clone cancels them all.
///
/// ```
/// use framesplit::CancellationToken;
///
/// let token = CancellationToken::new();
/// let clone = token.clone();
/// token.cancel();
/// assert!(clone.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Counts finished chunks for one video and fires the callback.
///
/// Shared by reference across worker threads.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    video: PathBuf,
    chunks_total: u64,
    /// `(chunks_completed, frames_saved)`.
    counts: Mutex<(u64, u64)>,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, video: &Path, chunks_total: u64) -> Self {
        Self {
            callback,
            video: video.to_path_buf(),
            chunks_total,
            counts: Mutex::new((0, 0)),
            start_time: Instant::now(),
        }
    }

    /// Record a finished chunk that wrote `saved` frames.
    pub(crate) fn chunk_finished(&self, saved: u64) {
        // Held across the callback so notifications arrive in count order.
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        counts.0 += 1;
        counts.1 += saved;

        self.callback.on_progress(&ProgressInfo {
            video: self.video.clone(),
            chunks_completed: counts.0,
            chunks_total: self.chunks_total,
            frames_saved: counts.1,
            elapsed: self.start_time.elapsed(),
        });
    }
}
