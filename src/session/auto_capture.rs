//! Periodic polling of a live session
//!
//! The loop ticks at the session's poll interval until a capture fires, the
//! session leaves the camera-on run it was started for, or a tick fails.
//! Stop, reset, manual capture and upload from another task all end that run;
//! so does a stop or reset followed at once by a fresh start.

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::scan::{SessionState, SharedSession, TickOutcome};
use crate::capture::FrameSource;
use crate::errors::ScanError;
use crate::types::CapturedImage;

/// Run the auto-capture loop on the tokio runtime.
///
/// Spawn it after [`ScanSession::start`](super::ScanSession::start). Resolves
/// to `Some(image)` on auto-capture and `None` when the run ended for any
/// other reason.
pub fn spawn_auto_capture<S>(session: SharedSession<S>) -> JoinHandle<Result<Option<CapturedImage>, ScanError>>
where
    S: FrameSource + 'static,
{
    tokio::spawn(run_auto_capture(session))
}

pub async fn run_auto_capture<S>(session: SharedSession<S>) -> Result<Option<CapturedImage>, ScanError>
where
    S: FrameSource + 'static,
{
    let (period, generation) = {
        let guard = session.lock().map_err(|_| ScanError::PoisonedLock)?;
        if guard.state() != SessionState::CameraOn {
            log::info!("Auto-capture loop not started: session is {:?}", guard.state());
            return Ok(None);
        }
        (guard.settings().poll_interval(), guard.generation())
    };
    log::info!(
        "Auto-capture loop started for run {} ({} ms period)",
        generation,
        period.as_millis()
    );

    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        // Frame analysis is CPU bound; keep it off the async workers.
        let shared = session.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut guard = shared.lock().map_err(|_| ScanError::PoisonedLock)?;
            guard.tick_generation(generation)
        })
        .await
        .map_err(|e| ScanError::Task(format!("Tick task failed: {}", e)))??;

        match outcome {
            TickOutcome::Captured(image) => {
                log::info!("Auto-capture loop finished with image {}", image.id);
                return Ok(Some(image));
            }
            TickOutcome::Inactive => {
                log::info!("Auto-capture loop for run {} stopped", generation);
                return Ok(None);
            }
            TickOutcome::NotReady | TickOutcome::Analyzed { .. } => {}
        }
    }
}
