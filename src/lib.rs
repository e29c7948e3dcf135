//! docscan: real-time document frame quality assessment and auto-capture
//!
//! This crate judges whether a live camera frame of an ID-card-sized document
//! is good enough to keep, and captures the guide region automatically once
//! frames stay good for long enough.
//!
//! # Features
//! - Sparse-grid brightness, sharpness and edge-density metrics
//! - Frame-to-frame motion detection
//! - Graded 0-100 score plus a single prioritized warning
//! - Validity-streak auto-capture with guide-frame cropping
//! - Manual capture and still upload with the same quality feedback
//! - TOML configuration for every threshold
//!
//! # Usage
//! ```rust,no_run
//! use docscan::capture::StillSource;
//! use docscan::{PixelBuffer, ScanSession};
//!
//! # fn main() -> Result<(), docscan::ScanError> {
//! let frame = PixelBuffer::load("card.png")?;
//! let mut session = ScanSession::new(StillSource::new(frame));
//! session.start()?;
//! let outcome = session.tick()?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
pub mod capture;
pub mod config;
pub mod errors;
pub mod invariant_ppt;
pub mod quality;
pub mod session;
pub mod types;

// Testing utilities - synthetic frames for offline testing
pub mod testing;

// Re-exports for convenience
pub use capture::{CaptureController, CaptureSettings, CropRect, FrameSource, GuideFrame};
pub use config::DocScanConfig;
pub use errors::ScanError;
pub use quality::{analyze, AnalysisResult, AnalyzerState, FrameAnalyzer, FrameMetrics, QualityThresholds, WarningKind};
pub use session::{spawn_auto_capture, ScanSession, SessionState, SharedSession, TickOutcome};
pub use types::{CaptureTrigger, CapturedImage, PixelBuffer};

/// Initialize logging for the scanner
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "docscan=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
