//! Sampling-rate planning.
//!
//! Converts a requested output frame rate into an integer stride over the
//! video's native frame indices. The stride is computed once per video and
//! handed to every extraction task unchanged, so "every Nth frame" always
//! refers to global frame indices regardless of how the video was chunked.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroU32,
};

use crate::error::ExtractError;

/// Sentinel used on the command line for "extract every frame".
pub const ALL_FRAMES_SENTINEL: i64 = -1;

/// The output frame rate requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFrameRate {
    /// Keep every frame of the source.
    #[default]
    All,
    /// Keep roughly this many frames per second of video.
    PerSecond(NonZeroU32),
}

impl TargetFrameRate {
    /// Interpret the integer form used by the CLI, where `-1` means
    /// [`TargetFrameRate::All`].
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Configuration`] for `0`, for negative values
    /// other than `-1`, and for values that do not fit in a `u32`.
    pub fn from_cli(value: i64) -> Result<Self, ExtractError> {
        if value == ALL_FRAMES_SENTINEL {
            return Ok(TargetFrameRate::All);
        }
        let per_second = u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                ExtractError::Configuration(format!(
                    "desired fps must be a positive integer or {ALL_FRAMES_SENTINEL}, got {value}"
                ))
            })?;
        Ok(TargetFrameRate::PerSecond(per_second))
    }
}

impl Display for TargetFrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TargetFrameRate::All => write!(f, "all frames"),
            TargetFrameRate::PerSecond(fps) => write!(f, "{fps} fps"),
        }
    }
}

/// Compute the sampling stride for a video.
///
/// Returns `1` for [`TargetFrameRate::All`]. Otherwise returns
/// `ceil(native_fps / target)`, never less than `1`: asking for more frames
/// than the source has keeps every frame rather than duplicating any.
///
/// # Errors
///
/// Returns [`ExtractError::Configuration`] when a target rate is given but
/// the native rate is not a positive finite number.
///
/// # Example
///
/// ```
/// use std::num::NonZeroU32;
///
/// use framesplit::{TargetFrameRate, sampling_stride};
///
/// let ten = TargetFrameRate::PerSecond(NonZeroU32::new(10).unwrap());
/// assert_eq!(sampling_stride(29.97, ten)?, 3);
/// assert_eq!(sampling_stride(29.97, TargetFrameRate::All)?, 1);
/// # Ok::<(), framesplit::ExtractError>(())
/// ```
pub fn sampling_stride(native_fps: f64, target: TargetFrameRate) -> Result<u64, ExtractError> {
    let TargetFrameRate::PerSecond(per_second) = target else {
        return Ok(1);
    };

    if !native_fps.is_finite() || native_fps <= 0.0 {
        return Err(ExtractError::Configuration(format!(
            "native frame rate must be positive to sample at {target}, got {native_fps}"
        )));
    }

    let stride = (native_fps / f64::from(per_second.get())).ceil() as u64;
    Ok(stride.max(1))
}
