//! Pixel conversions used by pipeline stages that publish debug images.

use super::buffer::{Depth, ImageBuffer};

/// Convert an 8-bit RGB image to grayscale using the ITU-R BT.601 luminance formula.
///
/// Y = 0.299*R + 0.587*G + 0.114*B, computed with integer math (coefficients
/// scaled by 1000). `dst` must be an 8-bit single-channel image with the same
/// size as `src`.
///
/// Returns `false` without touching `dst` if the layouts don't match.
pub fn to_grayscale_into(src: &ImageBuffer, dst: &mut ImageBuffer) -> bool {
    if src.depth() != Depth::U8
        || src.channels() != 3
        || dst.depth() != Depth::U8
        || dst.channels() != 1
        || src.size() != dst.size()
    {
        return false;
    }

    for (rgb, gray) in src.data().chunks_exact(3).zip(dst.data_mut().iter_mut()) {
        let r = rgb[0] as u32;
        let g = rgb[1] as u32;
        let b = rgb[2] as u32;
        *gray = ((299 * r + 587 * g + 114 * b) / 1000) as u8;
    }

    true
}

/// Binary threshold: pixels above `level` become 255, the rest 0.
///
/// Both images must be 8-bit single-channel with the same size.
pub fn threshold_into(src: &ImageBuffer, dst: &mut ImageBuffer, level: u8) -> bool {
    if src.depth() != Depth::U8
        || src.channels() != 1
        || dst.depth() != Depth::U8
        || dst.channels() != 1
        || src.size() != dst.size()
    {
        return false;
    }

    for (s, d) in src.data().iter().zip(dst.data_mut().iter_mut()) {
        *d = if *s > level { 255 } else { 0 };
    }

    true
}
