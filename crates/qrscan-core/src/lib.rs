//! qrscan core - QR code decoding for base64 data-URL images.
//!
//! # Architecture
//!
//! Every scan is a straight pipeline with no shared mutable state:
//!
//! ```text
//! data URL → split + base64 → validate → decode (image) → detect (rqrr) → symbols
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use qrscan_core::{Config, ScanProcessor};
//!
//! #[tokio::main]
//! async fn main() -> qrscan_core::Result<()> {
//!     let config = Config::load()?;
//!     let processor = ScanProcessor::new(&config);
//!
//!     let symbols = processor.scan_data_url("data:image/png;base64,...").await?;
//!     for symbol in symbols {
//!         println!("{} at ({}, {})", symbol.data, symbol.position.x, symbol.position.y);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

#[cfg(any(test, feature = "test-fixtures"))]
#[doc(hidden)]
pub mod test_fixtures;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, QrscanError, Result, ScanError, ScanResult};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{DataUrl, FileDiscovery, ScanProcessor};
pub use types::{DetectedSymbol, Position, ScanOutcome, ScanRequest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
