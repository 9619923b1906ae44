//! FFmpeg-backed error handling tests.
//!
//! Fixture-based tests are skipped when `tests/fixtures/sample_video.mp4`
//! is absent.

use std::path::Path;

use framesplit::{
    Coordinator, ExtractError, ExtractOptions, FfmpegCodec, FfmpegLogLevel, TargetFrameRate,
    VideoCodec, VideoSession,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

#[test]
fn open_nonexistent_file() {
    let result = FfmpegCodec::new().open(Path::new("this_file_does_not_exist.mp4"));
    let Err(error) = result else {
        panic!("Opening a missing file should fail");
    };

    assert!(matches!(error, ExtractError::SourceUnreadable { .. }));
    let message = error.to_string();
    assert!(
        message.contains("this_file_does_not_exist.mp4"),
        "Error should name the video: {message}",
    );
}

#[test]
fn open_invalid_file() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid = directory.path().join("invalid.mp4");
    std::fs::write(&invalid, b"this is not a media file").expect("Failed to write invalid file");

    let result = FfmpegCodec::new().open(&invalid);
    assert!(matches!(result, Err(ExtractError::SourceUnreadable { .. })));
}

#[test]
fn invalid_file_is_reported_by_the_coordinator() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid = directory.path().join("invalid.mp4");
    std::fs::write(&invalid, b"garbage").expect("Failed to write invalid file");

    let coordinator = Coordinator::new(FfmpegCodec::new(), ExtractOptions::new()).unwrap();
    let result = coordinator.process_video(&invalid, directory.path().join("frames"));
    assert!(matches!(result, Err(ExtractError::SourceUnreadable { .. })));
}

#[test]
fn log_level_names() {
    assert_eq!("quiet".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Quiet);
    assert_eq!("WARN".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Warning);
    assert!("loud".parse::<FfmpegLogLevel>().is_err());
}

#[test]
fn fixture_probe_reports_frames() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let session = FfmpegCodec::new()
        .open(Path::new(SAMPLE_VIDEO))
        .expect("Failed to open fixture");
    assert!(session.total_frame_count() > 0);
    assert!(session.native_fps() > 0.0);
}

#[test]
fn fixture_parallel_matches_sequential() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let sequential_output = tempfile::tempdir().expect("Failed to create temp dir");
    let parallel_output = tempfile::tempdir().expect("Failed to create temp dir");
    let target = TargetFrameRate::from_cli(2).unwrap();

    let sequential = Coordinator::new(
        FfmpegCodec::new(),
        ExtractOptions::new().with_target_fps(target),
    )
    .unwrap()
    .process_video(SAMPLE_VIDEO, sequential_output.path())
    .expect("Sequential extraction failed");

    let parallel = Coordinator::new(
        FfmpegCodec::new(),
        ExtractOptions::new()
            .with_target_fps(target)
            .with_parallel(true)
            .with_chunk_size(40)
            .with_max_workers(4),
    )
    .unwrap()
    .process_video(SAMPLE_VIDEO, parallel_output.path())
    .expect("Parallel extraction failed");

    assert!(sequential.frames_saved > 0);
    assert_eq!(parallel.frames_saved, sequential.frames_saved);
}
