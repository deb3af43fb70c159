//! Test fixtures: QR symbols painted onto greyscale canvases.
//!
//! Compiled for this crate's unit tests and, through the `test-fixtures`
//! feature, for the binary crate's tests and the benches.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::bits::Bits;
use qrcode::{Color, EcLevel, QrCode, Version};
use std::io::Cursor;

/// Pixels per QR module.
pub const MODULE_PX: u32 = 8;

/// A white canvas.
pub fn blank_canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([255]))
}

/// Encode raw bytes in byte mode at the smallest version that fits.
///
/// Forcing byte mode keeps UTF-8 sequences from being re-segmented as Kanji
/// and lets non-UTF-8 payloads through untouched.
pub fn byte_mode_code(data: &[u8]) -> QrCode {
    (1..=10)
        .find_map(|v| {
            let mut bits = Bits::new(Version::Normal(v));
            bits.push_byte_data(data).ok()?;
            bits.push_terminator(EcLevel::M).ok()?;
            QrCode::with_bits(bits, EcLevel::M).ok()
        })
        .expect("payload fits in a version 10 symbol")
}

/// Side length in pixels of the symbol `paint_qr` draws for `text`.
pub fn symbol_px(text: &str) -> u32 {
    byte_mode_code(text.as_bytes()).width() as u32 * MODULE_PX
}

/// Paint an encoded symbol whose top-left module starts at (`left`, `top`).
///
/// The caller leaves room for the quiet zone.
pub fn paint_code(canvas: &mut GrayImage, code: &QrCode, left: u32, top: u32) {
    let width = code.width();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let mx = (i % width) as u32;
        let my = (i / width) as u32;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                canvas.put_pixel(left + mx * MODULE_PX + dx, top + my * MODULE_PX + dy, Luma([0]));
            }
        }
    }
}

/// Paint `text` as a QR symbol whose top-left module starts at (`left`, `top`).
pub fn paint_qr(canvas: &mut GrayImage, text: &str, left: u32, top: u32) {
    paint_code(canvas, &byte_mode_code(text.as_bytes()), left, top);
}

/// A white canvas with each `(text, left, top)` symbol painted on it.
pub fn canvas_with(width: u32, height: u32, codes: &[(&str, u32, u32)]) -> GrayImage {
    let mut canvas = blank_canvas(width, height);
    for &(text, left, top) in codes {
        paint_qr(&mut canvas, text, left, top);
    }
    canvas
}

/// Encode a canvas in the given format.
pub fn encode(canvas: &GrayImage, format: ImageFormat) -> Vec<u8> {
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageLuma8(canvas.clone()).to_rgb8()),
        _ => DynamicImage::ImageLuma8(canvas.clone()),
    };
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .expect("in-memory encode");
    buffer.into_inner()
}

/// PNG of a 400x400 canvas with a single symbol at (40, 40).
pub fn qr_png(text: &str) -> Vec<u8> {
    encode(&canvas_with(400, 400, &[(text, 40, 40)]), ImageFormat::Png)
}

/// Wrap encoded bytes in a data URL the way a browser canvas does.
pub fn data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}
