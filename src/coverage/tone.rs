//! Grayscale versus color check

use image::RgbImage;

/// Luma with ITU-R 601-2 weights in 16-bit fixed point
#[inline]
fn luma([r, g, b]: [u8; 3]) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// True when the image differs from its own grayscale rendition by more
/// than `tolerance`, summed over every channel of every pixel.
pub fn is_color_image(image: &RgbImage, tolerance: u64) -> bool {
    let deviation: u64 = image
        .pixels()
        .map(|pixel| {
            let gray = luma(pixel.0);
            pixel
                .0
                .iter()
                .map(|&channel| u64::from(channel.abs_diff(gray)))
                .sum::<u64>()
        })
        .sum();

    deviation > tolerance
}
