//! Synthetic frames with known statistics
//!
//! Each generator produces a deterministic RGBA buffer whose brightness,
//! sharpness and edge content are easy to reason about, so analyzer and
//! controller behaviour can be tested without a camera.

use crate::capture::{GUIDE_ASPECT_RATIO, GUIDE_WIDTH_RATIO};
use crate::types::PixelBuffer;

/// Flat gray frame: no edges, brightness equal to `gray`
pub fn uniform_frame(width: u32, height: u32, gray: u8) -> PixelBuffer {
    PixelBuffer::filled(width, height, [gray, gray, gray, 255])
}

/// Checkerboard of `cell`-pixel squares alternating between `dark` and `light`
pub fn checkerboard_frame(width: u32, height: u32, cell: u32, dark: u8, light: u8) -> PixelBuffer {
    let cell = cell.max(1);
    from_fn(width, height, |x, y| {
        let v = if ((x / cell) + (y / cell)) % 2 == 0 { light } else { dark };
        [v, v, v, 255]
    })
}

/// One-pixel vertical stripes: even columns `even`, odd columns `odd`
pub fn column_stripes_frame(width: u32, height: u32, even: u8, odd: u8) -> PixelBuffer {
    from_fn(width, height, |x, _| {
        let v = if x % 2 == 0 { even } else { odd };
        [v, v, v, 255]
    })
}

/// A light ID card with rows of dark print, centered on a dim background.
///
/// The card fills the guide frame, so an auto-capture crop lands on it.
pub fn document_frame(width: u32, height: u32) -> PixelBuffer {
    let card_w = (width as f64 * GUIDE_WIDTH_RATIO) as u32;
    let card_h = (card_w as f64 / GUIDE_ASPECT_RATIO) as u32;
    let card_x = (width - card_w) / 2;
    let card_y = height.saturating_sub(card_h) / 2;
    let margin = card_w / 10;

    from_fn(width, height, |x, y| {
        let on_card = (card_x..card_x + card_w).contains(&x) && (card_y..card_y + card_h).contains(&y);
        if !on_card {
            return [60, 60, 60, 255];
        }
        let (lx, ly) = (x - card_x, y - card_y);
        let in_text_block = lx >= margin && lx < card_w - margin && ly >= card_h / 8;
        // Period 7 stays out of phase with the 6-pixel sampling grid
        if in_text_block && ly % 7 < 3 && lx % 7 != 6 {
            [30, 30, 30, 255]
        } else {
            [235, 230, 220, 255]
        }
    })
}

/// Photographic negative of `frame`, alpha untouched. Every red byte moves,
/// which reads as heavy motion against the source frame.
pub fn inverted_frame(frame: &PixelBuffer) -> PixelBuffer {
    let mut image = frame.clone().into_image();
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = 255 - *channel;
        }
    }
    PixelBuffer::from(image)
}

fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> PixelBuffer {
    PixelBuffer::from(image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(f(x, y))))
}
