//! Scan session lifecycle and the live auto-capture loop
pub mod auto_capture;
pub mod scan;

pub use auto_capture::{run_auto_capture, spawn_auto_capture};
pub use scan::{ScanSession, SessionState, SharedSession, TickOutcome};
