//! Core data types for the qrscan pipeline.
//!
//! `ScanRequest` and `DetectedSymbol` are the wire types of the HTTP API;
//! `ScanOutcome` is what the command-line scanner emits per file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Body of a `POST /scan` request.
///
/// `image` is optional at the type level so a missing field can be reported
/// as a scan error instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Data URL: `data:<mime>;base64,<payload>`
    #[serde(default)]
    pub image: Option<String>,
}

/// A decoded QR symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSymbol {
    /// Decoded text
    pub data: String,

    /// Top-left corner of the symbol's bounding box
    pub position: Position,
}

/// Pixel coordinate of a symbol's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Smallest x and smallest y over a set of corner points.
    ///
    /// Returns `None` for an empty set.
    pub fn top_left<I>(corners: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        corners.into_iter().fold(None, |acc, (x, y)| match acc {
            None => Some(Self { x, y }),
            Some(p) => Some(Self {
                x: p.x.min(x),
                y: p.y.min(y),
            }),
        })
    }
}

/// Symbols found in one file by the `scan` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Source file
    pub file: PathBuf,

    /// Detected image format ("png", "jpeg", ...)
    pub format: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Decoded symbols (possibly empty)
    pub symbols: Vec<DetectedSymbol>,
}
