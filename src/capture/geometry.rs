//! Guide-frame crop geometry
//!
//! The live preview shows a card-shaped guide centered on the feed. Capture
//! cuts exactly that region out of the full-resolution frame.

use serde::{Deserialize, Serialize};

use crate::errors::ScanError;
use crate::types::PixelBuffer;

/// Guide width as a fraction of the frame width
pub const GUIDE_WIDTH_RATIO: f64 = 0.9;
/// ID-1 card aspect ratio (85.60 x 53.98 mm)
pub const GUIDE_ASPECT_RATIO: f64 = 1.585;

/// Crop rectangle in source-frame pixel coordinates, before rounding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Integer `(x, y, width, height)` clipped to a `frame_width` x `frame_height` frame.
    ///
    /// The origin is rounded and the size truncated. Returns `None` when
    /// nothing of the rectangle lies inside the frame.
    pub fn pixel_bounds(&self, frame_width: u32, frame_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x = self.x.round().clamp(0.0, frame_width as f64) as u32;
        let y = self.y.round().clamp(0.0, frame_height as f64) as u32;
        let width = (self.width.max(0.0) as u32).min(frame_width - x);
        let height = (self.height.max(0.0) as u32).min(frame_height - y);

        if width == 0 || height == 0 {
            None
        } else {
            Some((x, y, width, height))
        }
    }
}

/// The card-shaped capture region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideFrame {
    pub width_ratio: f64,
    pub aspect_ratio: f64,
}

impl Default for GuideFrame {
    fn default() -> Self {
        Self {
            width_ratio: GUIDE_WIDTH_RATIO,
            aspect_ratio: GUIDE_ASPECT_RATIO,
        }
    }
}

impl GuideFrame {
    /// Centered guide rectangle for a `video_width` x `video_height` frame
    pub fn crop_rect(&self, video_width: u32, video_height: u32) -> CropRect {
        let width = video_width as f64 * self.width_ratio;
        let height = width / self.aspect_ratio;
        CropRect {
            x: (video_width as f64 - width) / 2.0,
            y: (video_height as f64 - height) / 2.0,
            width,
            height,
        }
    }

    /// Cut the guide region out of `frame` into a new still.
    pub fn extract(&self, frame: &PixelBuffer) -> Result<(PixelBuffer, CropRect), ScanError> {
        let rect = self.crop_rect(frame.width(), frame.height());
        let (x, y, width, height) = rect
            .pixel_bounds(frame.width(), frame.height())
            .ok_or(ScanError::EmptyCrop {
                width: frame.width(),
                height: frame.height(),
            })?;

        let row = frame.stride();
        let span = width as usize * PixelBuffer::BYTES_PER_PIXEL;
        let mut data = Vec::with_capacity(span * height as usize);
        for line in y..y + height {
            let start = line as usize * row + x as usize * PixelBuffer::BYTES_PER_PIXEL;
            data.extend_from_slice(&frame.data()[start..start + span]);
        }
        log::debug!(
            "Cropped guide frame {}x{} at ({}, {}) from {}x{}",
            width,
            height,
            x,
            y,
            frame.width(),
            frame.height()
        );
        Ok((PixelBuffer::new(width, height, data)?, rect))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.width_ratio > 0.0 && self.width_ratio <= 1.0) {
            return Err("Guide width ratio must be in (0.0, 1.0]".to_string());
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err("Guide aspect ratio must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{checkerboard_frame, uniform_frame};

    #[test]
    fn test_crop_rect_for_1280x800() {
        let rect = GuideFrame::default().crop_rect(1280, 800);
        assert_eq!(rect.width, 1152.0);
        assert!((rect.height - 726.8139).abs() < 1e-3);
        assert_eq!(rect.x, 64.0);
        assert!((rect.y - 36.5931).abs() < 1e-3);
    }

    #[test]
    fn test_pixel_bounds_round_origin_truncate_size() {
        let rect = GuideFrame::default().crop_rect(1280, 800);
        assert_eq!(rect.pixel_bounds(1280, 800), Some((64, 37, 1152, 726)));
    }

    #[test]
    fn test_pixel_bounds_clip_tall_guide() {
        // 16:9 frames are too short for a full-width card guide
        let rect = GuideFrame::default().crop_rect(1920, 1080);
        assert!(rect.y < 0.0);
        assert_eq!(rect.pixel_bounds(1920, 1080), Some((96, 0, 1728, 1080)));
    }

    #[test]
    fn test_extract_copies_region() {
        let frame = checkerboard_frame(64, 48, 8, 0, 255);
        let (still, rect) = GuideFrame::default().extract(&frame).unwrap();
        let (x, y, w, h) = rect.pixel_bounds(64, 48).unwrap();
        assert_eq!((still.width(), still.height()), (w, h));

        let source = frame.view();
        let cropped = still.into_image();
        assert_eq!(cropped.get_pixel(0, 0), source.get_pixel(x, y));
        assert_eq!(cropped.get_pixel(w - 1, h - 1), source.get_pixel(x + w - 1, y + h - 1));
    }

    #[test]
    fn test_extract_empty_frame_fails() {
        let result = GuideFrame::default().extract(&PixelBuffer::empty());
        assert!(matches!(result, Err(ScanError::EmptyCrop { .. })));
    }

    #[test]
    fn test_extract_tiny_frame() {
        // A 0.9-pixel-wide guide truncates to zero width
        let result = GuideFrame::default().extract(&uniform_frame(1, 1, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_guide_validation() {
        assert!(GuideFrame::default().validate().is_ok());
        assert!(GuideFrame { width_ratio: 0.0, ..Default::default() }.validate().is_err());
        assert!(GuideFrame { width_ratio: 1.2, ..Default::default() }.validate().is_err());
        assert!(GuideFrame { aspect_ratio: -1.0, ..Default::default() }.validate().is_err());
    }
}
