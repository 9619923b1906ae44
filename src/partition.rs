//! Frame-range partitioning.
//!
//! A video's frames are split into contiguous, half-open chunks so each
//! worker owns a disjoint set of frame indices (and therefore a disjoint set
//! of output files).

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Range,
};

use crate::error::ExtractError;

/// A half-open interval `[start, end)` of zero-based frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRange {
    /// First frame index in the range.
    pub start: u64,
    /// One past the last frame index in the range.
    pub end: u64,
}

impl FrameRange {
    /// Create a range. `start` is clamped so that `start <= end`.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start: start.min(end),
            end,
        }
    }

    /// Number of frame indices in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns `true` if the range contains no frame indices.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `frame_index` lies within the range.
    pub fn contains(&self, frame_index: u64) -> bool {
        (self.start..self.end).contains(&frame_index)
    }

    /// Iterate over the frame indices of the range.
    pub fn indices(&self) -> Range<u64> {
        self.start..self.end
    }

    /// Number of indices in the range that a sampling `stride` keeps.
    ///
    /// Counts global indices `i` with `i % stride == 0`.
    pub fn sampled_count(&self, stride: u64) -> u64 {
        let stride = stride.max(1);
        if self.is_empty() {
            return 0;
        }
        // Multiples of `stride` below `end` minus multiples below `start`.
        self.end.div_ceil(stride) - self.start.div_ceil(stride)
    }
}

impl Display for FrameRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Split `[0, total_frames)` into consecutive chunks of `chunk_size` frames.
///
/// The last chunk ends at `total_frames` and may be shorter than
/// `chunk_size`. A video with no frames produces no chunks.
///
/// # Errors
///
/// Returns [`ExtractError::Configuration`] if `chunk_size` is zero.
///
/// # Example
///
/// ```
/// use framesplit::{FrameRange, partition};
///
/// let chunks = partition(1000, 500)?;
/// assert_eq!(chunks, vec![FrameRange::new(0, 500), FrameRange::new(500, 1000)]);
/// # Ok::<(), framesplit::ExtractError>(())
/// ```
pub fn partition(total_frames: u64, chunk_size: u64) -> Result<Vec<FrameRange>, ExtractError> {
    if chunk_size == 0 {
        return Err(ExtractError::Configuration(
            "chunk size must be greater than zero".to_string(),
        ));
    }

    let chunks = (0..total_frames)
        .step_by(chunk_size as usize)
        .map(|start| FrameRange::new(start, start.saturating_add(chunk_size).min(total_frames)))
        .collect();

    Ok(chunks)
}
