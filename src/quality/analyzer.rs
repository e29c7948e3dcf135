use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::{motion_score, spatial_metrics, FrameMetrics};
use super::thresholds::QualityThresholds;
use crate::assert_invariant;
use crate::types::PixelBuffer;

/// Why a frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    HoldSteady,
    TooDark,
    TooBright,
    SlightlyBlurry,
    AdjustPosition,
}

impl WarningKind {
    /// User-facing English text
    pub fn message(self) -> &'static str {
        match self {
            WarningKind::HoldSteady => "Hold steady...",
            WarningKind::TooDark => "Too dark",
            WarningKind::TooBright => "Too bright",
            WarningKind::SlightlyBlurry => "Slightly blurry",
            WarningKind::AdjustPosition => "Adjust card position",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Shown instead of the edge-density text when only the combined score failed
pub const LOW_SCORE_MESSAGE: &str = "Adjust position";

/// Verdict for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub warning: Option<WarningKind>,
    /// 0-100
    pub score: u8,
    pub is_valid: bool,
    /// Every individual check passed and the frame failed on score alone
    #[serde(default)]
    pub low_score: bool,
    pub metrics: FrameMetrics,
}

impl AnalysisResult {
    /// Text for the UI, `None` for a valid frame
    pub fn message(&self) -> Option<&'static str> {
        if self.low_score {
            return Some(LOW_SCORE_MESSAGE);
        }
        self.warning.map(WarningKind::message)
    }
}

/// Temporal state of one scanning session
#[derive(Debug, Default)]
pub struct AnalyzerState {
    previous_frame: Option<PixelBuffer>,
}

impl AnalyzerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame of the most recent motion-enabled analysis
    pub fn previous_frame(&self) -> Option<&PixelBuffer> {
        self.previous_frame.as_ref()
    }

    pub fn has_previous_frame(&self) -> bool {
        self.previous_frame.is_some()
    }

    /// Drop the retained frame
    pub fn reset(&mut self) {
        self.previous_frame = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameAnalyzer {
    thresholds: QualityThresholds,
}

impl FrameAnalyzer {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Analyze one frame.
    ///
    /// With `motion_enabled` the frame is compared against the one retained in
    /// `state` and then retained in its place. Without it, `state` is cleared
    /// and no temporal comparison happens.
    pub fn analyze(&self, buffer: PixelBuffer, motion_enabled: bool, state: &mut AnalyzerState) -> AnalysisResult {
        if !motion_enabled {
            return self.analyze_still(&buffer, state);
        }

        let result = self.evaluate(&buffer, state.previous_frame.as_ref(), true);
        state.previous_frame = Some(buffer);
        result
    }

    /// Single-shot analysis of an uploaded or previewed still.
    ///
    /// Clears `state` first so leftovers from a live feed never leak into the
    /// verdict. The still is only borrowed since nothing is retained.
    pub fn analyze_still(&self, buffer: &PixelBuffer, state: &mut AnalyzerState) -> AnalysisResult {
        state.reset();
        let result = self.evaluate(buffer, None, false);

        assert_invariant!(
            !state.has_previous_frame(),
            "Still analysis never retains a previous frame",
            "FrameAnalyzer::analyze_still"
        );
        result
    }

    fn evaluate(&self, buffer: &PixelBuffer, previous: Option<&PixelBuffer>, motion_enabled: bool) -> AnalysisResult {
        let t = &self.thresholds;
        let mut metrics = spatial_metrics(buffer, t.sample_stride, t.sample_border, t.edge_laplacian);
        if let Some(previous) = previous {
            metrics.motion_score = motion_score(buffer.data(), previous.data(), t.motion_byte_stride);
        }

        let result = self.judge(metrics, motion_enabled);

        log::debug!(
            "Frame analyzed: brightness={:.1} sharpness={:.1} edges={:.4} motion={:.1} score={} warning={:?}",
            metrics.brightness,
            metrics.sharpness,
            metrics.edge_density,
            metrics.motion_score,
            result.score,
            result.warning
        );
        result
    }

    /// Score and verdict for already computed metrics
    pub fn judge(&self, metrics: FrameMetrics, motion_enabled: bool) -> AnalysisResult {
        let score = self.score(&metrics, motion_enabled);
        let warning = self.verdict(&metrics, score, motion_enabled);

        assert_invariant!(score <= 100, "Quality score stays within 0..=100", "FrameAnalyzer::judge");

        AnalysisResult {
            warning,
            score,
            is_valid: warning.is_none(),
            low_score: warning.is_some() && self.verdict(&metrics, u8::MAX, motion_enabled).is_none(),
            metrics,
        }
    }

    /// Graded score: 100 minus every penalty that applies, floored at 0
    pub fn score(&self, metrics: &FrameMetrics, motion_enabled: bool) -> u8 {
        let t = &self.thresholds;
        let mut penalty: u32 = 0;

        if metrics.brightness < t.score_min_brightness || metrics.brightness > t.score_max_brightness {
            penalty += t.brightness_penalty as u32;
        }
        if metrics.sharpness < t.score_min_sharpness {
            penalty += t.sharpness_penalty as u32;
        }
        if metrics.edge_density < t.score_min_edge_density {
            penalty += t.edge_density_penalty as u32;
        }
        if motion_enabled && metrics.motion_score > t.score_max_motion {
            penalty += t.motion_penalty as u32;
        }

        100u32.saturating_sub(penalty) as u8
    }

    /// First failing check, in priority order: motion, exposure, focus,
    /// content, overall score. `None` means the frame is valid.
    pub fn verdict(&self, metrics: &FrameMetrics, score: u8, motion_enabled: bool) -> Option<WarningKind> {
        let t = &self.thresholds;

        if motion_enabled && metrics.motion_score > t.reject_motion {
            return Some(WarningKind::HoldSteady);
        }
        if metrics.brightness < t.reject_min_brightness {
            return Some(WarningKind::TooDark);
        }
        if metrics.brightness > t.reject_max_brightness {
            return Some(WarningKind::TooBright);
        }
        if metrics.sharpness < t.reject_min_sharpness {
            return Some(WarningKind::SlightlyBlurry);
        }
        if metrics.edge_density < t.reject_min_edge_density {
            return Some(WarningKind::AdjustPosition);
        }
        if score < t.reject_min_score {
            return Some(WarningKind::AdjustPosition);
        }
        None
    }
}

/// Analyze with the default thresholds
pub fn analyze(buffer: PixelBuffer, motion_enabled: bool, state: &mut AnalyzerState) -> AnalysisResult {
    FrameAnalyzer::default().analyze(buffer, motion_enabled, state)
}
