//! Scan pipeline components.
//!
//! This module contains all the stages a scan goes through:
//! - **payload**: Split the data URL and base64-decode it
//! - **validate**: Size limits and magic-byte checks
//! - **decode**: Decode image bytes into a pixel buffer
//! - **detect**: Locate and decode QR symbols
//! - **processor**: Orchestrates the stages
//! - **discovery**: Find image files for command-line scans

pub mod decode;
pub mod detect;
pub mod discovery;
pub mod payload;
pub mod processor;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use detect::SymbolDetector;
pub use discovery::FileDiscovery;
pub use payload::DataUrl;
pub use processor::ScanProcessor;
pub use validate::Validator;
