//! Data-URL payload parsing and base64 decoding.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::{ScanError, ScanResult};

/// Standard alphabet, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A parsed `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone)]
pub struct DataUrl {
    /// MIME type declared in the prefix, if any
    pub mime: Option<String>,
    /// Decoded payload bytes
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Split on the first comma, discard the prefix, and base64-decode the rest.
    pub fn parse(input: &str) -> ScanResult<Self> {
        let (prefix, payload) = input.trim().split_once(',').ok_or_else(|| {
            ScanError::InvalidPayload("expected \"<prefix>,<base64 data>\"".to_string())
        })?;

        let bytes = decode_base64(payload)?;
        if bytes.is_empty() {
            return Err(ScanError::InvalidPayload("payload is empty".to_string()));
        }

        Ok(Self {
            mime: parse_mime(prefix),
            bytes,
        })
    }
}

/// Extract the MIME type from a `data:image/png;base64` prefix.
fn parse_mime(prefix: &str) -> Option<String> {
    let rest = prefix.strip_prefix("data:").unwrap_or(prefix);
    let mime = rest.split(';').next().unwrap_or("").trim();
    (!mime.is_empty()).then(|| mime.to_ascii_lowercase())
}

fn decode_base64(payload: &str) -> ScanResult<Vec<u8>> {
    // Line-wrapped base64 (MIME style) is common in hand-built payloads
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    STANDARD_LENIENT
        .decode(compact.as_bytes())
        .or_else(|e| URL_SAFE_LENIENT.decode(compact.as_bytes()).map_err(|_| e))
        .map_err(|e| ScanError::InvalidPayload(format!("invalid base64: {e}")))
}
