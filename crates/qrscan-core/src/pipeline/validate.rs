//! Input validation before decoding.

use crate::config::LimitsConfig;
use crate::error::{ScanError, ScanResult};

/// Validates payloads before they reach the image codec.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Reject encoded payloads over the size limit before base64-decoding them.
    pub fn check_payload_len(&self, encoded_len: usize) -> ScanResult<()> {
        if encoded_len > self.limits.max_payload_bytes() {
            return Err(ScanError::PayloadTooLarge {
                size_mb: (encoded_len / (1024 * 1024)) as u64,
                max_mb: self.limits.max_payload_mb,
            });
        }
        Ok(())
    }

    /// Quick check on decoded bytes before a full decode.
    ///
    /// Checks:
    /// - At least 4 bytes are present
    /// - The header matches a known image signature
    pub fn validate(&self, bytes: &[u8]) -> ScanResult<()> {
        if bytes.len() < 4 {
            return Err(ScanError::UnsupportedImage(
                "payload too small to be a valid image".to_string(),
            ));
        }

        if !Self::is_valid_image_header(bytes) {
            return Err(ScanError::UnsupportedImage(
                "unrecognized image format (invalid magic bytes)".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if the header bytes match known image formats.
    fn is_valid_image_header(header: &[u8]) -> bool {
        // JPEG: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // PNG: 89 50 4E 47
        if header.starts_with(&[0x89, b'P', b'N', b'G']) {
            return true;
        }

        // GIF: GIF8
        if header.starts_with(b"GIF8") {
            return true;
        }

        // WebP: RIFF....WEBP
        if header.starts_with(b"RIFF") {
            return header.len() >= 12 && &header[8..12] == b"WEBP";
        }

        // BMP: BM
        if header.starts_with(b"BM") {
            return true;
        }

        // TIFF: II (little-endian) or MM (big-endian) followed by version 42
        if header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
        {
            return true;
        }

        // ICO: 00 00 01 00
        if header.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
            return true;
        }

        // PNM family: P1..P7
        if header[0] == b'P' && (b'1'..=b'7').contains(&header[1]) && header[2].is_ascii_whitespace()
        {
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(LimitsConfig::default())
    }

    #[test]
    fn test_magic_bytes_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_webp() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'E', b'B', b'P'];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_riff_wav_rejected() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'A', b'V', b'E'];
        assert!(!Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_pgm() {
        assert!(Validator::is_valid_image_header(b"P5\n4 4\n255\n"));
    }

    #[test]
    fn test_magic_bytes_bare_ii_rejected() {
        let header = [b'I', b'I', 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(!Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_text_payload_rejected() {
        let err = validator().validate(b"hello world").unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedImage(_)));
    }

    #[test]
    fn test_tiny_payload_rejected() {
        let err = validator().validate(&[0xFF, 0xD8]).unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedImage(ref m) if m.contains("too small")));
    }

    #[test]
    fn test_payload_len_limit() {
        let limits = LimitsConfig {
            max_payload_mb: 1,
            ..LimitsConfig::default()
        };
        let validator = Validator::new(limits);
        assert!(validator.check_payload_len(1024 * 1024).is_ok());

        let err = validator.check_payload_len(3 * 1024 * 1024).unwrap_err();
        assert!(matches!(
            err,
            ScanError::PayloadTooLarge {
                size_mb: 3,
                max_mb: 1
            }
        ));
    }
}
