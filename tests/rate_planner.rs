//! Sampling stride planning tests.

use std::num::NonZeroU32;

use framesplit::{ExtractError, TargetFrameRate, sampling_stride};

fn per_second(fps: u32) -> TargetFrameRate {
    TargetFrameRate::PerSecond(NonZeroU32::new(fps).unwrap())
}

#[test]
fn all_frames_has_stride_one() {
    for native in [1.0, 23.976, 29.97, 30.0, 60.0, 240.0] {
        assert_eq!(sampling_stride(native, TargetFrameRate::All).unwrap(), 1);
    }
}

#[test]
fn all_frames_ignores_missing_native_rate() {
    assert_eq!(sampling_stride(0.0, TargetFrameRate::All).unwrap(), 1);
}

#[test]
fn exact_division() {
    assert_eq!(sampling_stride(30.0, per_second(10)).unwrap(), 3);
    assert_eq!(sampling_stride(60.0, per_second(1)).unwrap(), 60);
}

#[test]
fn fractional_rates_round_up() {
    assert_eq!(sampling_stride(29.97, per_second(10)).unwrap(), 3);
    assert_eq!(sampling_stride(25.0, per_second(10)).unwrap(), 3);
    assert_eq!(sampling_stride(23.976, per_second(1)).unwrap(), 24);
}

#[test]
fn target_above_native_keeps_every_frame() {
    assert_eq!(sampling_stride(24.0, per_second(60)).unwrap(), 1);
    assert_eq!(sampling_stride(0.5, per_second(1)).unwrap(), 1);
}

#[test]
fn non_positive_native_rate_is_rejected() {
    for native in [0.0, -30.0, f64::NAN, f64::INFINITY] {
        let result = sampling_stride(native, per_second(10));
        assert!(
            matches!(result, Err(ExtractError::Configuration(_))),
            "native rate {native} should be rejected, got {result:?}",
        );
    }
}

#[test]
fn cli_sentinel_means_all_frames() {
    assert_eq!(TargetFrameRate::from_cli(-1).unwrap(), TargetFrameRate::All);
    assert_eq!(TargetFrameRate::from_cli(10).unwrap(), per_second(10));
}

#[test]
fn cli_zero_and_other_negatives_are_rejected() {
    for value in [0, -2, -100, i64::from(u32::MAX) + 1] {
        let result = TargetFrameRate::from_cli(value);
        assert!(
            matches!(result, Err(ExtractError::Configuration(_))),
            "{value} should be rejected",
        );
    }
}

#[test]
fn display_names_the_rate() {
    assert_eq!(TargetFrameRate::All.to_string(), "all frames");
    assert_eq!(per_second(5).to_string(), "5 fps");
}
