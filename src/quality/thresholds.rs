//! Tunable analysis constants
//!
//! All values were tuned empirically against handheld ID-card captures.
//! They are heuristics, not derived bounds; adjust them through
//! `QualityThresholds` rather than editing the analysis code.

use serde::{Deserialize, Serialize};

/// Pixel stride of the sampling grid in both axes
pub const SAMPLE_STRIDE: u32 = 6;
/// Pixels skipped at each edge of the sampling grid
pub const SAMPLE_BORDER: u32 = 2;
/// Byte stride of the motion comparison over the raw buffer
pub const MOTION_BYTE_STRIDE: usize = 60;
/// Red-channel Laplacian above which a sample counts as an edge
pub const EDGE_LAPLACIAN_THRESHOLD: u32 = 40;

pub const SCORE_MIN_BRIGHTNESS: f64 = 45.0;
pub const SCORE_MAX_BRIGHTNESS: f64 = 245.0;
pub const SCORE_MIN_SHARPNESS: f64 = 18.0;
pub const SCORE_MIN_EDGE_DENSITY: f64 = 0.01;
pub const SCORE_MAX_MOTION: f64 = 30.0;

pub const BRIGHTNESS_PENALTY: u8 = 10;
pub const SHARPNESS_PENALTY: u8 = 25;
pub const EDGE_DENSITY_PENALTY: u8 = 15;
pub const MOTION_PENALTY: u8 = 20;

pub const REJECT_MOTION: f64 = 40.0;
pub const REJECT_MIN_BRIGHTNESS: f64 = 40.0;
pub const REJECT_MAX_BRIGHTNESS: f64 = 250.0;
pub const REJECT_MIN_SHARPNESS: f64 = 15.0;
pub const REJECT_MIN_EDGE_DENSITY: f64 = 0.008;
pub const REJECT_MIN_SCORE: u8 = 50;

/// Thresholds for one analyzer.
///
/// `score_*` fields drive the graded 0-100 score, `reject_*` fields the
/// pass/fail verdict. Rejection cutoffs sit outside the scoring cutoffs so a
/// frame near a boundary loses points before it flips to invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub sample_stride: u32,
    pub sample_border: u32,
    pub motion_byte_stride: usize,
    pub edge_laplacian: u32,

    pub score_min_brightness: f64,
    pub score_max_brightness: f64,
    pub score_min_sharpness: f64,
    pub score_min_edge_density: f64,
    pub score_max_motion: f64,

    pub brightness_penalty: u8,
    pub sharpness_penalty: u8,
    pub edge_density_penalty: u8,
    pub motion_penalty: u8,

    pub reject_motion: f64,
    pub reject_min_brightness: f64,
    pub reject_max_brightness: f64,
    pub reject_min_sharpness: f64,
    pub reject_min_edge_density: f64,
    pub reject_min_score: u8,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            sample_stride: SAMPLE_STRIDE,
            sample_border: SAMPLE_BORDER,
            motion_byte_stride: MOTION_BYTE_STRIDE,
            edge_laplacian: EDGE_LAPLACIAN_THRESHOLD,
            score_min_brightness: SCORE_MIN_BRIGHTNESS,
            score_max_brightness: SCORE_MAX_BRIGHTNESS,
            score_min_sharpness: SCORE_MIN_SHARPNESS,
            score_min_edge_density: SCORE_MIN_EDGE_DENSITY,
            score_max_motion: SCORE_MAX_MOTION,
            brightness_penalty: BRIGHTNESS_PENALTY,
            sharpness_penalty: SHARPNESS_PENALTY,
            edge_density_penalty: EDGE_DENSITY_PENALTY,
            motion_penalty: MOTION_PENALTY,
            reject_motion: REJECT_MOTION,
            reject_min_brightness: REJECT_MIN_BRIGHTNESS,
            reject_max_brightness: REJECT_MAX_BRIGHTNESS,
            reject_min_sharpness: REJECT_MIN_SHARPNESS,
            reject_min_edge_density: REJECT_MIN_EDGE_DENSITY,
            reject_min_score: REJECT_MIN_SCORE,
        }
    }
}

impl QualityThresholds {
    /// Check internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_stride == 0 {
            return Err("Sample stride must be at least 1".to_string());
        }
        if self.sample_border == 0 {
            return Err("Sample border must be at least 1 (Laplacian reads neighbours)".to_string());
        }
        if self.motion_byte_stride == 0 {
            return Err("Motion byte stride must be at least 1".to_string());
        }
        if self.score_min_brightness >= self.score_max_brightness {
            return Err("Scoring brightness range is empty".to_string());
        }
        if self.reject_min_brightness >= self.reject_max_brightness {
            return Err("Rejection brightness range is empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.score_min_edge_density)
            || !(0.0..=1.0).contains(&self.reject_min_edge_density)
        {
            return Err("Edge density thresholds must be between 0.0 and 1.0".to_string());
        }
        if self.reject_min_score > 100 {
            return Err("Minimum score must be between 0 and 100".to_string());
        }
        Ok(())
    }
}
