//! Quality Analysis Testing
//!
//! End-to-end checks of the frame analyzer through the public API:
//! - Verdict priority on synthetic frames
//! - Exposure boundaries
//! - Motion comparison and its state handling
//! - Threshold overrides

use docscan::quality::{analyze, AnalyzerState, FrameAnalyzer, QualityThresholds, WarningKind};
use docscan::testing::{checkerboard_frame, column_stripes_frame, document_frame, inverted_frame, uniform_frame};
use docscan::PixelBuffer;

#[test]
fn test_document_frame_is_valid() {
    for (w, h) in [(64, 48), (640, 480), (1280, 800)] {
        let mut state = AnalyzerState::new();
        let result = analyze(document_frame(w, h), true, &mut state);
        assert!(result.is_valid, "{}x{} rejected: {:?}", w, h, result);
        assert_eq!(result.warning, None);
        assert!(result.score >= 50);
    }
}

#[test]
fn test_flat_gray_frame_is_blurry() {
    let mut state = AnalyzerState::new();
    let result = analyze(uniform_frame(64, 48, 90), false, &mut state);

    assert_eq!(result.metrics.sharpness, 0.0);
    assert_eq!(result.metrics.edge_density, 0.0);
    // Sharpness and edge penalties: 100 - 25 - 15
    assert_eq!(result.score, 60);
    assert_eq!(result.warning, Some(WarningKind::SlightlyBlurry));
    assert!(!result.is_valid);
}

#[test]
fn test_dark_boundary() {
    let mut state = AnalyzerState::new();

    let below = analyze(uniform_frame(64, 48, 39), false, &mut state);
    assert_eq!(below.warning, Some(WarningKind::TooDark));

    // Exactly 40 is not "below 40"; the flat frame fails on focus instead
    let at = analyze(uniform_frame(64, 48, 40), false, &mut state);
    assert_eq!(at.metrics.brightness, 40.0);
    assert_eq!(at.warning, Some(WarningKind::SlightlyBlurry));
    // 40 is still under the scoring floor of 45
    assert_eq!(at.score, 50);
}

#[test]
fn test_bright_boundary() {
    let mut state = AnalyzerState::new();
    assert_eq!(
        analyze(uniform_frame(64, 48, 252), false, &mut state).warning,
        Some(WarningKind::TooBright)
    );
    assert_eq!(
        analyze(uniform_frame(64, 48, 250), false, &mut state).warning,
        Some(WarningKind::SlightlyBlurry)
    );
}

#[test]
fn test_textured_frame_without_edges() {
    let mut state = AnalyzerState::new();
    let result = analyze(column_stripes_frame(64, 48, 100, 110), false, &mut state);
    assert_eq!(result.warning, Some(WarningKind::AdjustPosition));
    assert_eq!(result.score, 85);
}

#[test]
fn test_first_frame_has_no_motion() {
    let mut state = AnalyzerState::new();
    let result = analyze(checkerboard_frame(64, 48, 8, 0, 255), true, &mut state);
    assert_eq!(result.metrics.motion_score, 0.0);
    assert!(state.has_previous_frame());
}

#[test]
fn test_identical_frames_have_no_motion() {
    let frame = document_frame(320, 240);
    let mut state = AnalyzerState::new();
    analyze(frame.clone(), true, &mut state);
    let result = analyze(frame, true, &mut state);
    assert_eq!(result.metrics.motion_score, 0.0);
    assert!(result.is_valid);
}

#[test]
fn test_shake_is_reported_first() {
    let frame = checkerboard_frame(64, 48, 8, 0, 255);
    let mut state = AnalyzerState::new();
    analyze(frame.clone(), true, &mut state);

    let result = analyze(inverted_frame(&frame), true, &mut state);
    assert_eq!(result.metrics.motion_score, 255.0);
    assert_eq!(result.warning, Some(WarningKind::HoldSteady));
    assert_eq!(result.score, 80);
}

#[test]
fn test_motion_disabled_ignores_previous_frame() {
    let frame = checkerboard_frame(64, 48, 8, 0, 255);
    let mut state = AnalyzerState::new();
    analyze(frame.clone(), true, &mut state);

    let result = analyze(inverted_frame(&frame), false, &mut state);
    assert_eq!(result.metrics.motion_score, 0.0);
    assert!(result.is_valid);
    assert!(!state.has_previous_frame());
}

#[test]
fn test_resolution_change_is_not_motion() {
    let mut state = AnalyzerState::new();
    analyze(checkerboard_frame(64, 48, 8, 0, 255), true, &mut state);
    let result = analyze(checkerboard_frame(128, 96, 8, 255, 0), true, &mut state);
    assert_eq!(result.metrics.motion_score, 0.0);
}

#[test]
fn test_still_analysis_matches_motion_disabled() {
    let analyzer = FrameAnalyzer::default();
    let frame = document_frame(320, 240);

    let mut a = AnalyzerState::new();
    let mut b = AnalyzerState::new();
    let still = analyzer.analyze_still(&frame, &mut a);
    let disabled = analyzer.analyze(frame, false, &mut b);
    assert_eq!(still, disabled);
}

#[test]
fn test_frame_below_grid_minimum() {
    // 4x4 has no grid sample: all statistics stay at zero
    let mut state = AnalyzerState::new();
    let result = analyze(uniform_frame(4, 4, 200), false, &mut state);
    assert_eq!(result.metrics.samples, 0);
    assert_eq!(result.metrics.brightness, 0.0);
    assert_eq!(result.warning, Some(WarningKind::TooDark));
}

#[test]
fn test_custom_thresholds() {
    let lenient = FrameAnalyzer::new(QualityThresholds {
        reject_min_sharpness: 0.0,
        reject_min_edge_density: 0.0,
        reject_min_score: 0,
        ..Default::default()
    });
    let mut state = AnalyzerState::new();
    let result = lenient.analyze(uniform_frame(64, 48, 128), false, &mut state);
    assert!(result.is_valid);
    assert_eq!(result.score, 60);
}

#[test]
fn test_rejects_bad_buffer_length() {
    let err = PixelBuffer::new(10, 10, vec![0; 399]).unwrap_err();
    assert!(err.to_string().contains("expected 400 bytes"));
}
