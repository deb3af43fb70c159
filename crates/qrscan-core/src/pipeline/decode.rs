//! Image decoding with content-based format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::{ScanError, ScanResult};

/// Image decoder with configurable limits.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Size of the encoded input in bytes
    pub byte_len: usize,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an in-memory image.
    ///
    /// Dimensions are read from the header first so oversized images are
    /// rejected before any pixel buffer is allocated. Blocking; callers on
    /// the async runtime run this inside `spawn_blocking`.
    pub fn decode(&self, bytes: &[u8]) -> ScanResult<DecodedImage> {
        let format = Self::guess_format(bytes)?;

        let (width, height) = Self::reader(bytes, format)
            .into_dimensions()
            .map_err(|e| ScanError::UnsupportedImage(format!("cannot read header: {e}")))?;
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(ScanError::ImageTooLarge {
                width,
                height,
                max_dim,
            });
        }

        let image = Self::reader(bytes, format)
            .decode()
            .map_err(|e| ScanError::UnsupportedImage(e.to_string()))?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
            byte_len: bytes.len(),
        })
    }

    fn guess_format(bytes: &[u8]) -> ScanResult<ImageFormat> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ScanError::UnsupportedImage(format!("cannot detect image format: {e}")))?
            .format()
            .ok_or_else(|| ScanError::UnsupportedImage("unknown image format".to_string()))
    }

    fn reader(bytes: &[u8], format: ImageFormat) -> ImageReader<Cursor<&[u8]>> {
        ImageReader::with_format(Cursor::new(bytes), format)
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Ico => "ico".to_string(),
        ImageFormat::Pnm => "pnm".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        _ => "unknown".to_string(),
    }
}
