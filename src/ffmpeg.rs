//! FFmpeg-backed implementation of the codec seam.
//!
//! [`FfmpegCodec`] opens files with `ffmpeg-next`, decodes the best video
//! stream, and converts every frame to an RGB8 [`DynamicImage`]. Seeking is
//! frame-accurate: the demuxer jumps to the keyframe at or before the target
//! and frames are decoded forward until the target index is reached. Frame
//! indices count from the stream's first timestamp, so sources that do not
//! start at zero (MPEG-TS, trimmed files) number their first frame `0`.
//!
//! FFmpeg has its own logging, separate from the `log` crate; use
//! [`set_ffmpeg_log_level`] to tune how much it prints to stderr.

use std::{path::Path, str::FromStr};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational, Rescale,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    ffi::AV_NOPTS_VALUE,
    media::Type,
    rescale::TIME_BASE,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::log::Level,
};
use image::{DynamicImage, RgbImage};

use crate::{
    codec::{VideoCodec, VideoSession},
    error::ExtractError,
};

/// FFmpeg internal log verbosity, most quiet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Unrecoverable errors only.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FfmpegLogLevel::Quiet),
            "fatal" | "panic" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" | "verbose" => Ok(FfmpegLogLevel::Info),
            "debug" | "trace" => Ok(FfmpegLogLevel::Debug),
            other => Err(ExtractError::Configuration(format!(
                "unknown FFmpeg log level: {other}"
            ))),
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// This controls what FFmpeg itself prints to stderr. It does **not** affect
/// messages emitted through the `log` crate.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

/// Opens videos with FFmpeg.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use framesplit::{FfmpegCodec, VideoCodec, VideoSession};
///
/// let session = FfmpegCodec::new().open(Path::new("input.mp4"))?;
/// println!("{} frames @ {:.2} fps", session.total_frame_count(), session.native_fps());
/// # Ok::<(), framesplit::ExtractError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegCodec;

impl FfmpegCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl VideoCodec for FfmpegCodec {
    type Session = FfmpegSession;

    fn open(&self, path: &Path) -> Result<FfmpegSession, ExtractError> {
        FfmpegSession::open(path)
    }
}

/// An open FFmpeg demuxer and decoder for one video stream.
pub struct FfmpegSession {
    input: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: Rational,
    /// First timestamp of the stream, in `time_base` units.
    stream_start: i64,
    frames_per_second: f64,
    frame_count: u64,
    width: u32,
    height: u32,
    /// Frame decoded while seeking that has not been handed out yet.
    pending: Option<DynamicImage>,
    /// End of file reached and the decoder has been sent EOF.
    drained: bool,
    /// Something was read since opening or the last rewind.
    started: bool,
}

impl FfmpegSession {
    fn open(path: &Path) -> Result<Self, ExtractError> {
        let unreadable = |reason: String| ExtractError::SourceUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        log::debug!("Opening video: {}", path.display());

        // Safe to call more than once.
        ffmpeg_next::init().map_err(|error| unreadable(format!("FFmpeg init failed: {error}")))?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| unreadable(error.to_string()))?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| unreadable("no video stream found".to_string()))?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        let stream_start = match stream.start_time() {
            AV_NOPTS_VALUE => 0,
            start => start,
        };

        let decoder_context = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| unreadable(format!("unreadable codec parameters: {error}")))?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| unreadable(format!("failed to create video decoder: {error}")))?;

        let width = decoder.width();
        let height = decoder.height();

        let frames_per_second = rational_to_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_f64(stream.rate()))
            .unwrap_or(0.0);

        // Prefer the container's frame count; fall back to duration × rate.
        let frame_count = if stream.frames() > 0 {
            stream.frames() as u64
        } else if input.duration() > 0 && frames_per_second > 0.0 {
            (input.duration() as f64 / 1_000_000.0 * frames_per_second) as u64
        } else {
            0
        };

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| unreadable(format!("failed to create pixel converter: {error}")))?;

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base,
            stream_start,
            frames_per_second,
            frame_count,
            width,
            height,
            pending: None,
            drained: false,
            started: false,
        })
    }

    /// Pull the next decoded frame of the video stream, feeding packets as
    /// needed. `Ok(None)` once the decoder is fully drained.
    fn decode_next(&mut self) -> Result<Option<VideoFrame>, ExtractError> {
        self.started = true;
        let mut decoded = VideoFrame::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return Ok(Some(decoded));
            }
            if self.drained {
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.drained = true;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    fn frame_number(&self, frame: &VideoFrame) -> Option<u64> {
        let timestamp = frame.timestamp().or_else(|| frame.pts())?;
        Some(frame_index_at(
            timestamp,
            self.stream_start,
            self.time_base,
            self.frames_per_second,
        ))
    }

    /// Rewind to the first frame. Needs no frame rate.
    fn rewind(&mut self) -> Result<(), ExtractError> {
        if !self.started {
            return Ok(());
        }
        let start = self.stream_start.rescale(self.time_base, TIME_BASE);
        log::debug!("Rewinding to the first frame (t={start}us)");
        self.input.seek(start, ..start)?;
        self.decoder.flush();
        self.drained = false;
        self.started = false;
        Ok(())
    }

    fn to_image(&mut self, frame: &VideoFrame) -> Result<DynamicImage, ExtractError> {
        let mut rgb_frame = VideoFrame::empty();
        self.scaler.run(frame, &mut rgb_frame)?;

        let buffer = packed_rgb_buffer(&rgb_frame, self.width, self.height);
        let image = RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            ExtractError::Decode("decoded frame does not match the stream dimensions".to_string())
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl VideoSession for FfmpegSession {
    fn total_frame_count(&self) -> u64 {
        self.frame_count
    }

    fn native_fps(&self) -> f64 {
        self.frames_per_second
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), ExtractError> {
        self.pending = None;
        let timestamp = match seek_target(frame_index, self.frames_per_second)? {
            SeekTarget::Start => return self.rewind(),
            SeekTarget::Offset(offset) => {
                self.stream_start.rescale(self.time_base, TIME_BASE) + offset
            }
        };

        // Container-level seeks take AV_TIME_BASE (microsecond) timestamps.
        log::debug!("Seeking to frame {frame_index} (t={timestamp}us)");
        self.input.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.drained = false;

        while let Some(frame) = self.decode_next()? {
            let reached = self
                .frame_number(&frame)
                .is_none_or(|number| number >= frame_index);
            if reached {
                self.pending = Some(self.to_image(&frame)?);
                break;
            }
        }

        Ok(())
    }

    fn read_next(&mut self) -> Result<Option<DynamicImage>, ExtractError> {
        if let Some(image) = self.pending.take() {
            return Ok(Some(image));
        }
        match self.decode_next()? {
            Some(frame) => self.to_image(&frame).map(Some),
            None => Ok(None),
        }
    }

    fn skip_next(&mut self) -> Result<bool, ExtractError> {
        if self.pending.take().is_some() {
            return Ok(true);
        }
        Ok(self.decode_next()?.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekTarget {
    /// The first frame of the stream.
    Start,
    /// Microseconds after the stream's first timestamp.
    Offset(i64),
}

fn seek_target(frame_index: u64, frames_per_second: f64) -> Result<SeekTarget, ExtractError> {
    if frame_index == 0 {
        return Ok(SeekTarget::Start);
    }
    if frames_per_second <= 0.0 || !frames_per_second.is_finite() {
        return Err(ExtractError::Decode(format!(
            "cannot seek to frame {frame_index} in a stream without a frame rate"
        )));
    }
    let offset = (frame_index as f64 / frames_per_second * 1_000_000.0) as i64;
    Ok(SeekTarget::Offset(offset))
}

/// Zero-based frame index of `timestamp`, counted from `stream_start`.
/// Timestamps before the start map to frame `0`.
fn frame_index_at(
    timestamp: i64,
    stream_start: i64,
    time_base: Rational,
    frames_per_second: f64,
) -> u64 {
    let elapsed = timestamp.saturating_sub(stream_start) as f64
        * f64::from(time_base.numerator())
        / f64::from(time_base.denominator());
    (elapsed * frames_per_second).round().max(0.0) as u64
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    (rate.denominator() != 0 && rate.numerator() > 0)
        .then(|| f64::from(rate.numerator()) / f64::from(rate.denominator()))
}

/// Copy an RGB24 frame into a tightly packed buffer, dropping per-row padding.
fn packed_rgb_buffer(frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let row_bytes = width as usize * 3;
    let data = frame.data(0);

    if stride == row_bytes {
        return data[..row_bytes * height as usize].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    buffer
}
