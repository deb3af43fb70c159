//! Pipeline orchestration - wires together all scan stages.

use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::{Config, LimitsConfig};
use crate::error::{ScanError, ScanResult};
use crate::types::{DetectedSymbol, ScanOutcome};

use super::decode::{format_to_string, DecodedImage, ImageDecoder};
use super::detect::SymbolDetector;
use super::payload::DataUrl;
use super::validate::Validator;

/// The scanner: data URL in, decoded symbols out.
///
/// Holds no per-request state, so one instance is shared by every request.
pub struct ScanProcessor {
    decoder: ImageDecoder,
    validator: Validator,
    limits: LimitsConfig,
}

/// Decoded image plus the symbols found in it.
struct Scanned {
    format: String,
    width: u32,
    height: u32,
    symbols: Vec<DetectedSymbol>,
}

impl ScanProcessor {
    /// Create a new processor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            validator: Validator::new(config.limits.clone()),
            limits: config.limits.clone(),
        }
    }

    /// Scan a `data:<mime>;base64,<payload>` string.
    pub async fn scan_data_url(&self, input: &str) -> ScanResult<Vec<DetectedSymbol>> {
        let start = Instant::now();

        self.validator.check_payload_len(input.len())?;
        let url = DataUrl::parse(input)?;
        tracing::trace!(
            "  Payload: {} bytes ({}) in {:?}",
            url.bytes.len(),
            url.mime.as_deref().unwrap_or("no mime"),
            start.elapsed()
        );

        let symbols = self.scan_bytes(url.bytes).await?;
        tracing::debug!(
            "Scanned payload in {:?}: {} symbol(s)",
            start.elapsed(),
            symbols.len()
        );
        Ok(symbols)
    }

    /// Scan raw encoded image bytes.
    pub async fn scan_bytes(&self, bytes: Vec<u8>) -> ScanResult<Vec<DetectedSymbol>> {
        Ok(self.scan_blocking(bytes).await?.symbols)
    }

    /// Scan an image file from disk.
    pub async fn scan_file(&self, path: &Path) -> ScanResult<ScanOutcome> {
        tracing::debug!("Scanning: {:?}", path);
        let bytes = tokio::fs::read(path).await.map_err(|e| ScanError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let scanned = self.scan_blocking(bytes).await?;
        Ok(ScanOutcome {
            file: path.to_path_buf(),
            format: scanned.format,
            width: scanned.width,
            height: scanned.height,
            symbols: scanned.symbols,
        })
    }

    /// Validate, decode and detect on the blocking pool under the decode timeout.
    ///
    /// The timeout answers the caller but cannot interrupt the blocking task:
    /// a decode already in progress runs to completion on the pool. The task
    /// checks the same deadline after decoding and skips detection once it
    /// has passed, so an abandoned scan does no further work.
    async fn scan_blocking(&self, bytes: Vec<u8>) -> ScanResult<Scanned> {
        self.validator.validate(&bytes)?;

        let decoder = self.decoder.clone();
        let timeout_ms = self.limits.decode_timeout_ms;
        let budget = Duration::from_millis(timeout_ms);
        let deadline = Instant::now() + budget;
        let result = timeout(
            budget,
            tokio::task::spawn_blocking(move || {
                Self::decode_and_detect(&decoder, &bytes, deadline, timeout_ms)
            }),
        )
        .await;

        match result {
            Ok(Ok(scanned)) => scanned,
            Ok(Err(e)) => Err(ScanError::Internal(format!("Task join error: {e}"))),
            Err(_) => Err(ScanError::Timeout {
                stage: "decode".to_string(),
                timeout_ms,
            }),
        }
    }

    fn decode_and_detect(
        decoder: &ImageDecoder,
        bytes: &[u8],
        deadline: Instant,
        timeout_ms: u64,
    ) -> ScanResult<Scanned> {
        let decode_start = Instant::now();
        let DecodedImage {
            image,
            format,
            width,
            height,
            byte_len,
        } = decoder.decode(bytes)?;
        tracing::trace!(
            "  Decode: {:?} ({}x{} {}, {} bytes)",
            decode_start.elapsed(),
            width,
            height,
            format_to_string(format),
            byte_len
        );

        if Instant::now() >= deadline {
            tracing::debug!("Deadline passed after decode, skipping detection");
            return Err(ScanError::Timeout {
                stage: "decode".to_string(),
                timeout_ms,
            });
        }

        let detect_start = Instant::now();
        let symbols = SymbolDetector::detect(&image);
        tracing::trace!("  Detect: {:?}", detect_start.elapsed());

        Ok(Scanned {
            format: format_to_string(format),
            width,
            height,
            symbols,
        })
    }
}
