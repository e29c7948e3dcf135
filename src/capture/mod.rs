//! Auto-capture: guide-frame geometry, the validity-streak controller and
//! the frame-source seam it polls.
pub mod controller;
pub mod geometry;
pub mod source;

pub use controller::{
    CaptureController, CaptureSettings, Poll, ValidityStreak, DEFAULT_MIN_STABLE_MS,
    DEFAULT_POLL_INTERVAL_MS,
};
pub use geometry::{CropRect, GuideFrame, GUIDE_ASPECT_RATIO, GUIDE_WIDTH_RATIO};
pub use source::{FrameSource, ReplaySource, StillSource};
