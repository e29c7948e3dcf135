//! Auto-capture decision engine
//!
//! Each poll analyzes one frame with motion comparison enabled and tracks how
//! long frames have been continuously valid. Once the run reaches the stable
//! duration the controller crops the guide region and reports a capture.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::geometry::GuideFrame;
use crate::assert_invariant;
use crate::errors::ScanError;
use crate::quality::{AnalysisResult, AnalyzerState, FrameAnalyzer};
use crate::types::{CaptureTrigger, CapturedImage, PixelBuffer};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;
pub const DEFAULT_MIN_STABLE_MS: u64 = 1200;

/// Capture loop tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Polling period of the live loop
    pub poll_interval_ms: u64,
    /// How long frames must stay valid before auto-capture fires
    pub min_stable_ms: u64,
    pub guide: GuideFrame,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            min_stable_ms: DEFAULT_MIN_STABLE_MS,
            guide: GuideFrame::default(),
        }
    }
}

impl CaptureSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn min_stable(&self) -> Duration {
        Duration::from_millis(self.min_stable_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be at least 1 ms".to_string());
        }
        self.guide.validate()
    }
}

/// Start of the current unbroken run of valid polls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityStreak {
    valid_since: Option<Instant>,
}

impl ValidityStreak {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid_since(&self) -> Option<Instant> {
        self.valid_since
    }

    pub fn is_active(&self) -> bool {
        self.valid_since.is_some()
    }

    /// Record a poll and return how long the streak has lasted.
    /// An invalid poll ends the streak and returns zero.
    pub fn observe(&mut self, is_valid: bool, now: Instant) -> Duration {
        if !is_valid {
            self.valid_since = None;
            return Duration::ZERO;
        }
        let since = *self.valid_since.get_or_insert(now);
        now.saturating_duration_since(since)
    }

    pub fn clear(&mut self) {
        self.valid_since = None;
    }
}

/// Result of one controller poll
#[derive(Debug, Clone)]
pub enum Poll {
    /// Source had no usable frame; streak untouched
    NotReady,
    /// Frame analyzed, no capture yet
    Pending {
        result: AnalysisResult,
        stable_for: Duration,
    },
    /// Streak reached the stable duration and the guide region was cropped
    Capture {
        result: AnalysisResult,
        image: CapturedImage,
    },
}

/// Analyzer state plus validity streak for one live session
#[derive(Debug)]
pub struct CaptureController {
    analyzer: FrameAnalyzer,
    settings: CaptureSettings,
    state: AnalyzerState,
    streak: ValidityStreak,
}

impl CaptureController {
    pub fn new(analyzer: FrameAnalyzer, settings: CaptureSettings) -> Self {
        Self {
            analyzer,
            settings,
            state: AnalyzerState::new(),
            streak: ValidityStreak::new(),
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn analyzer(&self) -> &FrameAnalyzer {
        &self.analyzer
    }

    pub fn analyzer_state(&self) -> &AnalyzerState {
        &self.state
    }

    /// Single-shot analysis outside the live loop; drops the streak and
    /// any retained frame
    pub fn analyze_still(&mut self, still: &PixelBuffer) -> AnalysisResult {
        self.streak.clear();
        self.analyzer.analyze_still(still, &mut self.state)
    }

    pub fn streak(&self) -> &ValidityStreak {
        &self.streak
    }

    /// Forget the previous frame and any streak in progress
    pub fn reset(&mut self) {
        self.state.reset();
        self.streak.clear();
    }

    /// One poll of the live feed at time `now`.
    ///
    /// A missing, 0x0 or too-small frame is skipped without touching the
    /// streak; a not-ready camera must not look like a bad frame.
    pub fn poll(&mut self, frame: Option<PixelBuffer>, now: Instant) -> Result<Poll, ScanError> {
        let frame = match frame {
            Some(frame) if frame.is_analyzable() => frame,
            Some(frame) => {
                log::debug!("Skipping poll: frame {}x{} not ready", frame.width(), frame.height());
                return Ok(Poll::NotReady);
            }
            None => {
                log::debug!("Skipping poll: source not ready");
                return Ok(Poll::NotReady);
            }
        };

        let result = self.analyzer.analyze(frame, true, &mut self.state);
        let stable_for = self.streak.observe(result.is_valid, now);

        assert_invariant!(
            result.is_valid == self.streak.is_active(),
            "Validity streak runs exactly while polls are valid",
            "CaptureController::poll"
        );

        if !result.is_valid || stable_for < self.settings.min_stable() {
            return Ok(Poll::Pending { result, stable_for });
        }

        // The analyzer kept the frame it just judged valid; crop from it.
        let frame = self.state.previous_frame().ok_or(ScanError::SourceNotReady)?;
        let (still, rect) = self.settings.guide.extract(frame)?;
        self.streak.clear();

        log::info!(
            "Auto-capture after {} ms stable: score={} crop={}x{}",
            stable_for.as_millis(),
            result.score,
            still.width(),
            still.height()
        );

        Ok(Poll::Capture {
            result,
            image: CapturedImage::new(CaptureTrigger::Auto, still, Some(rect)),
        })
    }
}
