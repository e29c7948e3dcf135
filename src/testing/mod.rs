//! Testing utilities for docscan
//!
//! Synthetic frames with predictable statistics for offline testing and
//! benchmarking without a camera.

pub mod synthetic_data;

pub use synthetic_data::{
    checkerboard_frame,
    column_stripes_frame,
    document_frame,
    inverted_frame,
    uniform_frame,
};
