//! Per-frame statistics behind the quality verdict
//!
//! Spatial statistics come from a sparse sampling grid; motion compares the
//! raw bytes of two frames at a coarse fixed stride.
use serde::{Deserialize, Serialize};

use crate::types::PixelBuffer;

/// Raw measurements for one analyzed frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Mean luma over the sampling grid, 0-255
    pub brightness: f64,
    /// Mean red-channel Laplacian magnitude over the sampling grid
    pub sharpness: f64,
    /// Fraction of samples whose Laplacian exceeds the edge threshold
    pub edge_density: f64,
    /// Mean absolute byte difference against the previous frame, 0 when not compared
    pub motion_score: f64,
    /// Number of grid samples
    pub samples: usize,
}

/// Broadcast (BT.601) luma
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Brightness, sharpness and edge density over the sampling grid.
///
/// Grid points run from `border` to `dimension - border` (exclusive) every
/// `stride` pixels. With a zero-sample grid every statistic is 0.
pub fn spatial_metrics(buffer: &PixelBuffer, stride: u32, border: u32, edge_threshold: u32) -> FrameMetrics {
    let data = buffer.data();
    let row = buffer.stride();
    let step = stride.max(1) as usize;
    let border = border.max(1);
    let x_end = buffer.width().saturating_sub(border);
    let y_end = buffer.height().saturating_sub(border);

    let mut brightness_sum = 0.0;
    let mut laplacian_sum: u64 = 0;
    let mut edges: usize = 0;
    let mut samples: usize = 0;

    for y in (border..y_end).step_by(step) {
        for x in (border..x_end).step_by(step) {
            let idx = y as usize * row + x as usize * PixelBuffer::BYTES_PER_PIXEL;

            brightness_sum += luma(data[idx], data[idx + 1], data[idx + 2]);

            let center = data[idx] as i32;
            let left = data[idx - PixelBuffer::BYTES_PER_PIXEL] as i32;
            let right = data[idx + PixelBuffer::BYTES_PER_PIXEL] as i32;
            let top = data[idx - row] as i32;
            let bottom = data[idx + row] as i32;
            let laplacian = (4 * center - left - right - top - bottom).unsigned_abs();

            laplacian_sum += laplacian as u64;
            if laplacian > edge_threshold {
                edges += 1;
            }
            samples += 1;
        }
    }

    if samples == 0 {
        return FrameMetrics::default();
    }

    let n = samples as f64;
    FrameMetrics {
        brightness: brightness_sum / n,
        sharpness: laplacian_sum as f64 / n,
        edge_density: edges as f64 / n,
        motion_score: 0.0,
        samples,
    }
}

/// Mean absolute difference of bytes at every `stride`-th offset.
///
/// Frames of different byte length are not comparable and score 0.
pub fn motion_score(current: &[u8], previous: &[u8], stride: usize) -> f64 {
    if current.len() != previous.len() || current.is_empty() {
        return 0.0;
    }

    let mut diff: u64 = 0;
    let mut strides: u64 = 0;
    for i in (0..current.len()).step_by(stride.max(1)) {
        diff += current[i].abs_diff(previous[i]) as u64;
        strides += 1;
    }

    diff as f64 / strides as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::thresholds::{EDGE_LAPLACIAN_THRESHOLD, SAMPLE_BORDER, SAMPLE_STRIDE};
    use crate::testing::{checkerboard_frame, uniform_frame};

    fn defaults(buffer: &PixelBuffer) -> FrameMetrics {
        spatial_metrics(buffer, SAMPLE_STRIDE, SAMPLE_BORDER, EDGE_LAPLACIAN_THRESHOLD)
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        assert_eq!(luma(40, 40, 40), 40.0);
        assert_eq!(luma(255, 255, 255), 255.0);
        assert!((luma(255, 0, 0) - 76.245).abs() < 1e-9);
    }

    #[test]
    fn test_sample_count_follows_grid() {
        // x in 2..62 step 6 -> 10 columns, y in 2..46 step 6 -> 8 rows
        let m = defaults(&uniform_frame(64, 48, 128));
        assert_eq!(m.samples, 80);

        // 5x5 is the smallest grid with a sample
        assert_eq!(defaults(&uniform_frame(5, 5, 128)).samples, 1);
        assert_eq!(defaults(&uniform_frame(4, 4, 128)).samples, 0);
    }

    #[test]
    fn test_uniform_frame_has_no_edges() {
        let m = defaults(&uniform_frame(64, 48, 90));
        assert_eq!(m.brightness, 90.0);
        assert_eq!(m.sharpness, 0.0);
        assert_eq!(m.edge_density, 0.0);
    }

    #[test]
    fn test_checkerboard_is_sharp() {
        let m = defaults(&checkerboard_frame(64, 48, 8, 0, 255));
        assert_eq!(m.brightness, 127.5);
        assert!((m.sharpness - 140.25).abs() < 1e-9);
        assert!((m.edge_density - 0.475).abs() < 1e-9);
    }

    #[test]
    fn test_laplacian_uses_red_channel_only() {
        // Green and blue checkerboard with flat red: no sharpness
        let mut frame = checkerboard_frame(32, 32, 4, 0, 255).into_image();
        for pixel in frame.pixels_mut() {
            pixel.0[0] = 100;
        }
        let m = defaults(&PixelBuffer::from(frame));
        assert_eq!(m.sharpness, 0.0);
        assert_eq!(m.edge_density, 0.0);
    }

    #[test]
    fn test_zero_sample_grid_is_all_zero() {
        assert_eq!(defaults(&PixelBuffer::empty()), FrameMetrics::default());
    }

    #[test]
    fn test_motion_score_identical_and_opposite() {
        let a = uniform_frame(20, 20, 0);
        let b = uniform_frame(20, 20, 255);
        assert_eq!(motion_score(a.data(), a.data(), 60), 0.0);
        // Offsets that are multiples of 60 always land on the red channel
        assert_eq!(motion_score(a.data(), b.data(), 60), 255.0);
    }

    #[test]
    fn test_motion_score_divides_by_strides_taken() {
        // 8 bytes at stride 3 -> offsets 0, 3, 6
        let current = [10u8, 0, 0, 10, 0, 0, 10, 0];
        let previous = [0u8; 8];
        assert_eq!(motion_score(&current, &previous, 3), 10.0);
    }

    #[test]
    fn test_motion_score_length_mismatch_is_zero() {
        let a = uniform_frame(20, 20, 0);
        let b = uniform_frame(20, 21, 255);
        assert_eq!(motion_score(a.data(), b.data(), 60), 0.0);
    }
}
