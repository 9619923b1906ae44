//! Frame-range partitioning tests.

use framesplit::{ExtractError, FrameRange, partition};

fn assert_exact_cover(chunks: &[FrameRange], total_frames: u64) {
    let mut next = 0;
    for chunk in chunks {
        assert_eq!(chunk.start, next, "gap or overlap before {chunk}");
        assert!(!chunk.is_empty(), "empty chunk {chunk}");
        next = chunk.end;
    }
    assert_eq!(next, total_frames, "chunks do not reach the last frame");
}

#[test]
fn final_chunk_is_half_open_at_total() {
    let chunks = partition(1000, 500).unwrap();
    assert_eq!(chunks, vec![FrameRange::new(0, 500), FrameRange::new(500, 1000)]);
}

#[test]
fn short_final_chunk() {
    let chunks = partition(100, 40).unwrap();
    assert_eq!(
        chunks,
        vec![
            FrameRange::new(0, 40),
            FrameRange::new(40, 80),
            FrameRange::new(80, 100),
        ]
    );
}

#[test]
fn every_frame_covered_exactly_once() {
    for total_frames in [1, 2, 7, 99, 100, 101, 1000, 4321] {
        for chunk_size in [1, 3, 40, 100, 500, 10_000] {
            let chunks = partition(total_frames, chunk_size).unwrap();
            assert_exact_cover(&chunks, total_frames);

            let covered: u64 = chunks.iter().map(FrameRange::len).sum();
            assert_eq!(covered, total_frames);
        }
    }
}

#[test]
fn chunk_larger_than_video_is_one_chunk() {
    assert_eq!(partition(30, 500).unwrap(), vec![FrameRange::new(0, 30)]);
}

#[test]
fn empty_video_has_no_chunks() {
    assert!(partition(0, 500).unwrap().is_empty());
}

#[test]
fn zero_chunk_size_is_rejected() {
    assert!(matches!(
        partition(100, 0),
        Err(ExtractError::Configuration(_))
    ));
}

#[test]
fn sampled_count_uses_global_indices() {
    // Multiples of 10 in [0, 40), [40, 80), [80, 100).
    assert_eq!(FrameRange::new(0, 40).sampled_count(10), 4);
    assert_eq!(FrameRange::new(40, 80).sampled_count(10), 4);
    assert_eq!(FrameRange::new(80, 100).sampled_count(10), 2);

    // A chunk that does not start on a multiple of the stride.
    assert_eq!(FrameRange::new(7, 14).sampled_count(10), 1);
    assert_eq!(FrameRange::new(11, 19).sampled_count(10), 0);
    assert_eq!(FrameRange::new(5, 5).sampled_count(1), 0);
}

#[test]
fn range_helpers() {
    let range = FrameRange::new(40, 80);
    assert_eq!(range.len(), 40);
    assert!(range.contains(40));
    assert!(range.contains(79));
    assert!(!range.contains(80));
    assert_eq!(range.indices().count(), 40);
    assert_eq!(range.to_string(), "[40, 80)");

    // Start is clamped to end.
    assert!(FrameRange::new(10, 5).is_empty());
}
