use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::capture::{CaptureController, CaptureSettings, FrameSource, Poll};
use crate::config::DocScanConfig;
use crate::errors::ScanError;
use crate::quality::{AnalysisResult, FrameAnalyzer};
use crate::types::{CaptureTrigger, CapturedImage, PixelBuffer};

/// Lifecycle of one scanning session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    CameraOn,
    Captured,
}

/// What a single live-loop tick did
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Session is not live; the loop should stop
    Inactive,
    /// Source had no usable frame
    NotReady,
    Analyzed {
        result: AnalysisResult,
        stable_for: Duration,
    },
    Captured(CapturedImage),
}

/// Session shared between the auto-capture loop and user actions
pub type SharedSession<S> = Arc<Mutex<ScanSession<S>>>;

/// One document scan: live feed, quality feedback and the final still.
///
/// Only one of auto-capture, manual capture and upload can produce the
/// captured image; all three move the session to [`SessionState::Captured`]
/// and release the feed.
pub struct ScanSession<S: FrameSource> {
    id: Uuid,
    state: SessionState,
    /// Bumped on every start; a loop bound to an older value is stale
    generation: u64,
    source: S,
    controller: CaptureController,
    last_result: Option<AnalysisResult>,
    captured: Option<CapturedImage>,
    feedback: watch::Sender<Option<AnalysisResult>>,
}

impl<S: FrameSource> ScanSession<S> {
    pub fn new(source: S) -> Self {
        Self::with_parts(source, FrameAnalyzer::default(), CaptureSettings::default())
    }

    pub fn with_config(source: S, config: &DocScanConfig) -> Self {
        Self::with_parts(
            source,
            FrameAnalyzer::new(config.analyzer.clone()),
            config.capture.clone(),
        )
    }

    pub fn with_parts(source: S, analyzer: FrameAnalyzer, settings: CaptureSettings) -> Self {
        let (feedback, _) = watch::channel(None);
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            generation: 0,
            source,
            controller: CaptureController::new(analyzer, settings),
            last_result: None,
            captured: None,
            feedback,
        }
    }

    pub fn into_shared(self) -> SharedSession<S> {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identifies the current camera-on run
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Most recent verdict, cleared on start and reset
    pub fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_result.as_ref()
    }

    pub fn captured(&self) -> Option<&CapturedImage> {
        self.captured.as_ref()
    }

    pub fn settings(&self) -> &CaptureSettings {
        self.controller.settings()
    }

    pub fn controller(&self) -> &CaptureController {
        &self.controller
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn is_streak_active(&self) -> bool {
        self.controller.streak().is_active()
    }

    /// Live feedback channel; holds the latest verdict or `None`
    pub fn subscribe(&self) -> watch::Receiver<Option<AnalysisResult>> {
        self.feedback.subscribe()
    }

    /// Turn the camera on
    pub fn start(&mut self) -> Result<(), ScanError> {
        self.expect_state(SessionState::Idle, "start the camera")?;

        self.source.start()?;
        self.controller.reset();
        self.publish(None);
        self.generation = self.generation.wrapping_add(1);
        self.transition(SessionState::CameraOn);
        Ok(())
    }

    /// Turn the camera off without capturing
    pub fn stop(&mut self) -> Result<(), ScanError> {
        self.expect_state(SessionState::CameraOn, "stop the camera")?;

        self.source.stop();
        self.controller.reset();
        self.publish(None);
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Back to a fresh idle session. Safe to call in any state.
    pub fn reset(&mut self) {
        self.source.stop();
        self.controller.reset();
        self.captured = None;
        self.publish(None);
        self.transition(SessionState::Idle);
    }

    pub fn tick(&mut self) -> Result<TickOutcome, ScanError> {
        self.tick_at(Instant::now())
    }

    /// Tick only if `generation` is still the live run.
    ///
    /// A run that was stopped or reset and then started again never sees
    /// polls from a loop that belonged to the earlier run.
    pub fn tick_generation(&mut self, generation: u64) -> Result<TickOutcome, ScanError> {
        if generation != self.generation {
            log::debug!(
                "Session {}: ignoring tick from run {} (current run {})",
                self.id,
                generation,
                self.generation
            );
            return Ok(TickOutcome::Inactive);
        }
        self.tick()
    }

    /// One poll of the live feed at time `now`
    pub fn tick_at(&mut self, now: Instant) -> Result<TickOutcome, ScanError> {
        if self.state != SessionState::CameraOn {
            return Ok(TickOutcome::Inactive);
        }

        let frame = self.source.current_frame();
        match self.controller.poll(frame, now)? {
            Poll::NotReady => Ok(TickOutcome::NotReady),
            Poll::Pending { result, stable_for } => {
                self.publish(Some(result));
                Ok(TickOutcome::Analyzed { result, stable_for })
            }
            Poll::Capture { result, image } => {
                self.publish(Some(result));
                self.finish(image.clone());
                Ok(TickOutcome::Captured(image))
            }
        }
    }

    /// Capture the guide region of the current frame regardless of quality
    pub fn capture_now(&mut self) -> Result<CapturedImage, ScanError> {
        self.expect_state(SessionState::CameraOn, "capture")?;

        let frame = self
            .source
            .current_frame()
            .filter(PixelBuffer::is_ready)
            .ok_or(ScanError::SourceNotReady)?;
        let (still, rect) = self.controller.settings().guide.extract(&frame)?;

        let image = CapturedImage::new(CaptureTrigger::Manual, still, Some(rect));
        log::info!("Manual capture {}x{}", image.width(), image.height());
        self.finish(image.clone());
        Ok(image)
    }

    /// Use an uploaded still instead of the live feed.
    ///
    /// The still is analyzed once with motion disabled and kept uncropped.
    pub fn submit_still(&mut self, buffer: PixelBuffer) -> Result<AnalysisResult, ScanError> {
        if self.state == SessionState::Captured {
            return Err(ScanError::InvalidTransition {
                state: self.state,
                action: "upload a still",
            });
        }
        buffer.ensure_analyzable()?;

        let result = self.controller.analyze_still(&buffer);
        self.publish(Some(result));

        log::info!(
            "Uploaded still {}x{}: score={} valid={}",
            buffer.width(),
            buffer.height(),
            result.score,
            result.is_valid
        );
        self.finish(CapturedImage::new(CaptureTrigger::Upload, buffer, None));
        Ok(result)
    }

    fn finish(&mut self, image: CapturedImage) {
        self.source.stop();
        self.controller.reset();
        self.captured = Some(image);
        self.transition(SessionState::Captured);
    }

    fn publish(&mut self, result: Option<AnalysisResult>) {
        self.last_result = result;
        self.feedback.send_replace(result);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            log::info!("Session {}: {:?} -> {:?}", self.id, self.state, next);
        }
        self.state = next;
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), ScanError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ScanError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }
}
