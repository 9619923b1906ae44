//! Benchmarks for rate planning, partitioning, and frame extraction.
//!
//! Run with: cargo bench
//!
//! The extraction benchmarks need `tests/fixtures/sample_video.mp4` and are
//! skipped without it.

use std::{hint::black_box, path::Path, time::Duration};

use criterion::Criterion;
use framesplit::{
    Coordinator, ExtractOptions, FfmpegCodec, FfmpegLogLevel, TargetFrameRate, partition,
    sampling_stride, set_ffmpeg_log_level,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn benchmark_planning(criterion: &mut Criterion) {
    let target = TargetFrameRate::from_cli(5).unwrap();

    criterion.bench_function("sampling stride", |bencher| {
        bencher.iter(|| sampling_stride(black_box(29.97), black_box(target)).unwrap());
    });

    criterion.bench_function("partition 1M frames into 500-frame chunks", |bencher| {
        bencher.iter(|| partition(black_box(1_000_000), black_box(500)).unwrap());
    });
}

fn benchmark_extraction(criterion: &mut Criterion) {
    set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let mut group = criterion.benchmark_group("extraction");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    let target = TargetFrameRate::from_cli(2).unwrap();
    let variants = [
        ("sequential", ExtractOptions::new()),
        (
            "parallel",
            ExtractOptions::new().with_parallel(true).with_chunk_size(50),
        ),
    ];

    for (name, options) in variants {
        let coordinator = Coordinator::new(
            FfmpegCodec::new(),
            options.with_target_fps(target).with_overwrite(true),
        )
        .unwrap();

        group.bench_function(name, |bencher| {
            let output = tempfile::tempdir().unwrap();
            bencher.iter(|| coordinator.process_video(SAMPLE_VIDEO, output.path()).unwrap());
        });
    }

    group.finish();
}

criterion::criterion_group!(benches, benchmark_planning, benchmark_extraction);
criterion::criterion_main!(benches);
