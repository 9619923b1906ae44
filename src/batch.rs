//! Batch processing over many videos.
//!
//! [`discover_videos`] turns the user's input path into a list of videos and
//! [`Coordinator::process_batch`] extracts them one after another. A failing
//! video is recorded and the batch moves on; only cancellation stops it.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    codec::VideoCodec,
    coordinator::{Coordinator, VideoOutput},
    error::ExtractError,
};

/// Resolve an input path into the videos to process.
///
/// A file yields itself. A directory yields the regular files directly
/// inside it, sorted by path; subdirectories are not descended into.
///
/// # Errors
///
/// Returns [`ExtractError::SourceUnreadable`] if `input` does not exist or
/// the directory cannot be listed.
pub fn discover_videos(input: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExtractError> {
    let input = input.as_ref();
    let unreadable = |reason: String| ExtractError::SourceUnreadable {
        path: input.to_path_buf(),
        reason,
    };

    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(unreadable("no such file or directory".to_string()));
    }

    let mut videos = Vec::new();
    for entry in fs::read_dir(input).map_err(|error| unreadable(error.to_string()))? {
        let path = entry.map_err(|error| unreadable(error.to_string()))?.path();
        if path.is_file() {
            videos.push(path);
        } else {
            log::debug!("Skipping non-file entry {}", path.display());
        }
    }
    videos.sort();

    Ok(videos)
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Videos that were extracted completely.
    pub outputs: Vec<VideoOutput>,
    /// Videos that failed, with the reason.
    pub failures: Vec<(PathBuf, ExtractError)>,
    /// Set when the batch stopped early because of cancellation.
    pub cancelled: bool,
}

impl BatchReport {
    /// Frames written across all successful videos.
    pub fn frames_saved(&self) -> u64 {
        self.outputs.iter().map(|output| output.frames_saved).sum()
    }

    /// Returns `true` if every video succeeded and the batch ran to the end.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

impl<C: VideoCodec> Coordinator<C> {
    /// Extract every video in `videos` into `output_root`, in order.
    ///
    /// Failures are collected in the returned [`BatchReport`] instead of
    /// aborting the batch. Videos sharing a file name write into the same
    /// output directory; this is logged as a warning.
    pub fn process_batch(&self, videos: &[PathBuf], output_root: impl AsRef<Path>) -> BatchReport {
        let output_root = output_root.as_ref();
        warn_on_name_collisions(videos);

        let mut report = BatchReport::default();
        for video in videos {
            match self.process_video(video, output_root) {
                Ok(output) => report.outputs.push(output),
                Err(ExtractError::Cancelled) => {
                    log::warn!("Cancelled while extracting {}", video.display());
                    report.cancelled = true;
                    break;
                }
                Err(error) => {
                    log::error!("{}: {error}", video.display());
                    report.failures.push((video.clone(), error));
                }
            }
        }

        report
    }
}

fn warn_on_name_collisions(videos: &[PathBuf]) {
    let mut seen: HashMap<_, &PathBuf> = HashMap::new();
    for video in videos {
        let Some(name) = video.file_name() else {
            continue;
        };
        if let Some(first) = seen.insert(name, video) {
            log::warn!(
                "{} and {} share an output directory; frames may mix",
                first.display(),
                video.display()
            );
        }
    }
}
