use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid buffer length for {width}x{height}: expected {expected} bytes, got {actual}")]
    InvalidBufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Frame too small for analysis: {width}x{height} (minimum 5x5)")]
    FrameTooSmall { width: u32, height: u32 },
    #[error("Frame source is not ready")]
    SourceNotReady,
    #[error("Cannot {action} while session is {state:?}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },
    #[error("Crop rectangle is empty for a {width}x{height} frame")]
    EmptyCrop { width: u32, height: u32 },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Session lock poisoned by previous panic")]
    PoisonedLock,
    #[error("Task error: {0}")]
    Task(String),
}
