//! Synthetic codec shared by the integration tests.
//!
//! Produces tiny solid-color frames whose color encodes the frame index, so
//! extraction can be exercised without media fixtures or FFmpeg.

#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use framesplit::{ExtractError, VideoCodec, VideoSession};
use image::{DynamicImage, Rgb, RgbImage};

#[derive(Debug, Clone)]
pub struct SyntheticCodec {
    /// Frame count reported to the coordinator.
    pub total_frames: u64,
    /// Frames that can actually be read; fewer than `total_frames`
    /// simulates a stream that ends early.
    pub readable_frames: u64,
    pub native_fps: f64,
    /// Seeking to any of these frame indices fails.
    pub failing_seeks: Vec<u64>,
    /// Every open fails.
    pub unreadable: bool,
    pub opens: Arc<AtomicUsize>,
    /// Images produced by `read_next`; skipped frames are not counted.
    pub decoded_images: Arc<AtomicUsize>,
}

impl SyntheticCodec {
    pub fn new(total_frames: u64, native_fps: f64) -> Self {
        Self {
            total_frames,
            readable_frames: total_frames,
            native_fps,
            failing_seeks: Vec::new(),
            unreadable: false,
            opens: Arc::new(AtomicUsize::new(0)),
            decoded_images: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_readable_frames(mut self, readable_frames: u64) -> Self {
        self.readable_frames = readable_frames;
        self
    }

    pub fn failing_seek_to(mut self, frame_index: u64) -> Self {
        self.failing_seeks.push(frame_index);
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn decoded_image_count(&self) -> usize {
        self.decoded_images.load(Ordering::SeqCst)
    }
}

pub struct SyntheticSession {
    codec: SyntheticCodec,
    position: u64,
}

impl VideoCodec for SyntheticCodec {
    type Session = SyntheticSession;

    fn open(&self, path: &Path) -> Result<SyntheticSession, ExtractError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.unreadable {
            return Err(ExtractError::SourceUnreadable {
                path: path.to_path_buf(),
                reason: "synthetic open failure".to_string(),
            });
        }
        Ok(SyntheticSession {
            codec: self.clone(),
            position: 0,
        })
    }
}

impl VideoSession for SyntheticSession {
    fn total_frame_count(&self) -> u64 {
        self.codec.total_frames
    }

    fn native_fps(&self) -> f64 {
        self.codec.native_fps
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), ExtractError> {
        if self.codec.failing_seeks.contains(&frame_index) {
            return Err(ExtractError::Decode(format!(
                "injected seek failure at frame {frame_index}"
            )));
        }
        self.position = frame_index;
        Ok(())
    }

    fn read_next(&mut self) -> Result<Option<DynamicImage>, ExtractError> {
        if self.position >= self.codec.readable_frames {
            return Ok(None);
        }
        let image = frame_image(self.position);
        self.position += 1;
        self.codec.decoded_images.fetch_add(1, Ordering::SeqCst);
        Ok(Some(image))
    }

    fn skip_next(&mut self) -> Result<bool, ExtractError> {
        if self.position >= self.codec.readable_frames {
            return Ok(false);
        }
        self.position += 1;
        Ok(true)
    }
}

pub fn frame_image(frame_index: u64) -> DynamicImage {
    let color = Rgb([
        (frame_index % 256) as u8,
        (frame_index / 256 % 256) as u8,
        128,
    ]);
    DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, color))
}

/// File names inside `directory`, sorted.
pub fn file_names(directory: &Path) -> BTreeSet<String> {
    fs::read_dir(directory)
        .expect("Failed to list output directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

/// Expected file names for the given frame indices.
pub fn expected_names(indices: impl IntoIterator<Item = u64>, extension: &str) -> BTreeSet<String> {
    indices
        .into_iter()
        .map(|index| format!("{index:010}.{extension}"))
        .collect()
}
