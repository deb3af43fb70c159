//! QR symbol detection and decoding.
//!
//! The heavy lifting is done by `rqrr`: it locates finder patterns, fits a
//! grid, and runs Reed-Solomon correction. This stage only feeds it a
//! greyscale buffer and reshapes its output.

use image::DynamicImage;
use rqrr::{BitGrid, Point, PreparedImage};

use crate::types::{DetectedSymbol, Position};

/// Finds and decodes every QR symbol in an image.
pub struct SymbolDetector;

impl SymbolDetector {
    /// Detect all decodable symbols, ordered top-to-bottom then left-to-right.
    ///
    /// Grids that fail to decode are skipped. Payloads that are not valid
    /// UTF-8 are converted lossily.
    pub fn detect(image: &DynamicImage) -> Vec<DetectedSymbol> {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                luma.get_pixel(x as u32, y as u32).0[0]
            });

        let grids = prepared.detect_grids();
        tracing::trace!("  Candidate grids: {}", grids.len());

        let mut symbols = Vec::with_capacity(grids.len());
        for grid in &grids {
            let corners = symbol_corners(&grid.bounds, grid.grid.size());
            let Some(position) = Position::top_left(corners) else {
                continue;
            };

            let mut raw = Vec::new();
            match grid.decode_to(&mut raw) {
                Ok(_) => {
                    tracing::trace!(
                        "  Decoded symbol at ({}, {}): {} bytes",
                        position.x,
                        position.y,
                        raw.len()
                    );
                    symbols.push(DetectedSymbol {
                        data: String::from_utf8_lossy(&raw).into_owned(),
                        position,
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        "Skipping undecodable grid at ({}, {}): {}",
                        position.x,
                        position.y,
                        e
                    );
                }
            }
        }

        order_symbols(symbols)
    }
}

/// Corner points of a detected grid, clipped to the symbol itself.
///
/// `rqrr` reports corners 1 to 3 one module past the symbol's far edges, so
/// each is pulled back toward corner 0 by `size / (size + 1)`. Without this
/// the box is a module too large on the side away from corner 0, which shifts
/// the top-left of any symbol that is not upright.
fn symbol_corners(bounds: &[Point; 4], size: usize) -> [(i32, i32); 4] {
    let origin = bounds[0];
    let scale = size as f64 / (size + 1) as f64;
    let pull = |p: Point| {
        (
            origin.x + (f64::from(p.x - origin.x) * scale).round() as i32,
            origin.y + (f64::from(p.y - origin.y) * scale).round() as i32,
        )
    };
    [
        (origin.x, origin.y),
        pull(bounds[1]),
        pull(bounds[2]),
        pull(bounds[3]),
    ]
}

/// Sort top-to-bottom then left-to-right and drop exact duplicates.
fn order_symbols(mut symbols: Vec<DetectedSymbol>) -> Vec<DetectedSymbol> {
    symbols.sort_by(|a, b| {
        (a.position.y, a.position.x, &a.data).cmp(&(b.position.y, b.position.x, &b.data))
    });
    symbols.dedup();
    symbols
}
