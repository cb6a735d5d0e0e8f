//! Image loading for artwork files
//!
//! This module provides a single entry point for loading artwork from the
//! raster formats the `image` crate is built with here: JPEG, PNG, GIF
//! (first frame only), WebP, TIFF and BMP.
//!
//! ## Design
//!
//! The format is chosen from the file extension before anything is read so
//! that unsupported files fail fast with a clear message. Decoded images are
//! returned as-is; callers convert to RGB where they need it, which drops any
//! alpha channel.

use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::error::{QuoteError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    fn codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Load and decode an artwork file
///
/// # Errors
///
/// Returns `QuoteError::ImageLoadError` if:
/// - The extension is not a supported format
/// - The file cannot be opened
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use print_quote::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("artwork.png"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), print_quote::QuoteError>(())
/// ```
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| QuoteError::ImageLoadError {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        QuoteError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    reader.set_format(format.codec());

    let image = reader.decode().map_err(|e| {
        QuoteError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded image"
    );
    Ok(image)
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
