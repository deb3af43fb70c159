//! Configuration validation with range checks.

use http::{HeaderName, Method};

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.limits.max_payload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_payload_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::ValidationError(
                "cors.allowed_origins must not be empty".into(),
            ));
        }
        if self.cors.allowed_methods.is_empty() {
            return Err(ConfigError::ValidationError(
                "cors.allowed_methods must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .cors
            .allowed_methods
            .iter()
            .find(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()).is_err())
        {
            return Err(ConfigError::ValidationError(format!(
                "cors.allowed_methods contains invalid method {bad:?}"
            )));
        }
        if let Some(bad) = self
            .cors
            .allowed_headers
            .iter()
            .find(|h| HeaderName::from_bytes(h.as_bytes()).is_err())
        {
            return Err(ConfigError::ValidationError(format!(
                "cors.allowed_headers contains invalid header name {bad:?}"
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}
