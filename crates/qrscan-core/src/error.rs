//! Error types for the qrscan pipeline.
//!
//! Scan errors map one-to-one onto the failure modes a client can cause
//! (bad payload, bad image, oversized input) so the HTTP layer can pick a
//! status code without inspecting messages. The status mapping itself lives
//! in the server.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for qrscan operations.
#[derive(Error, Debug)]
pub enum QrscanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scan pipeline errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors produced while scanning a single image.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Request body could not be parsed as a scan request
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The `image` field is absent, null, or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Payload is not a `<prefix>,<base64>` data URL or the base64 is invalid
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Decoded bytes are not an image the codec understands
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// Encoded payload exceeds the configured size limit
    #[error("Payload too large ({size_mb}MB > {max_mb}MB)")]
    PayloadTooLarge { size_mb: u64, max_mb: u64 },

    /// Image dimensions exceed limit
    #[error("Image too large ({width}x{height} > {max_dim})")]
    ImageTooLarge { width: u32, height: u32, max_dim: u32 },

    /// Decode or detection did not finish in time
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// Image file could not be read (CLI scans only)
    #[error("Cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Anything else (blocking task panicked or was cancelled)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for qrscan results.
pub type Result<T> = std::result::Result<T, QrscanError>;

/// Convenience type alias for scan-specific results.
pub type ScanResult<T> = std::result::Result<T, ScanError>;
