use std::path::Path;

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capture::CropRect;
use crate::errors::ScanError;

/// JPEG quality used when handing a capture to the upload collaborator
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// One frame as interleaved RGBA bytes, row-major, top-left origin.
///
/// The byte length always equals `width * height * 4`. A 0x0 buffer is how a
/// frame source says it has nothing to show yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub const BYTES_PER_PIXEL: usize = 4;
    /// The sampling window touches a 2-pixel border on each side
    pub const MIN_ANALYZABLE_DIMENSION: u32 = 5;

    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ScanError> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(ScanError::InvalidBufferLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `rgba`
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * Self::BYTES_PER_PIXEL);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// The 0x0 "not ready" buffer
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row stride in bytes
    pub fn stride(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    /// False while the source reports zero dimensions
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn is_analyzable(&self) -> bool {
        self.width >= Self::MIN_ANALYZABLE_DIMENSION && self.height >= Self::MIN_ANALYZABLE_DIMENSION
    }

    pub fn ensure_analyzable(&self) -> Result<(), ScanError> {
        if self.is_analyzable() {
            Ok(())
        } else {
            Err(ScanError::FrameTooSmall {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Borrowing view for `image` operations, no copy
    pub fn view(&self) -> ImageBuffer<Rgba<u8>, &[u8]> {
        ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
            .expect("length checked on construction")
    }

    pub fn into_image(self) -> RgbaImage {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.data).expect("length checked on construction")
    }

    /// Decode any format `image` understands and convert to RGBA
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let decoded = image::open(path.as_ref())?;
        log::debug!(
            "Loaded still {:?} ({}x{})",
            path.as_ref(),
            decoded.width(),
            decoded.height()
        );
        Ok(Self::from(decoded.to_rgba8()))
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// What caused a still to be captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureTrigger {
    /// Validity streak reached the stable duration
    Auto,
    /// User pressed capture
    Manual,
    /// Still supplied by the upload path
    Upload,
}

/// A still image ready for the upload collaborator
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub trigger: CaptureTrigger,
    pub buffer: PixelBuffer,
    /// Guide-frame region the still was cut from, if it was cropped
    pub crop: Option<CropRect>,
}

impl CapturedImage {
    pub fn new(trigger: CaptureTrigger, buffer: PixelBuffer, crop: Option<CropRect>) -> Self {
        Self {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            trigger,
            buffer,
            crop,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Encode as JPEG. Alpha is dropped since JPEG has no alpha channel.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ScanError> {
        let rgb = image::DynamicImage::ImageRgba8(self.buffer.clone().into_image()).to_rgb8();
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
        Ok(out)
    }

    /// Save to disk; format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScanError> {
        let path = path.as_ref();
        let is_jpeg = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
            .unwrap_or(false);

        if is_jpeg {
            std::fs::write(path, self.encode_jpeg(DEFAULT_JPEG_QUALITY)?)?;
        } else {
            self.buffer.view().save(path)?;
        }
        log::info!(
            "Saved capture {} ({}x{}) to {:?}",
            self.id,
            self.width(),
            self.height(),
            path
        );
        Ok(())
    }
}
