//! Frame quality assessment
//!
//! Scores a single frame for brightness, sharpness, edge content and motion
//! against the previous frame, and turns those statistics into a pass/fail
//! verdict with a user-facing warning.
pub mod analyzer;
pub mod metrics;
pub mod thresholds;

pub use analyzer::{analyze, AnalysisResult, AnalyzerState, FrameAnalyzer, WarningKind};
pub use metrics::{luma, motion_score, spatial_metrics, FrameMetrics};
pub use thresholds::QualityThresholds;
