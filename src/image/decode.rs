//! Image decoding

use anyhow::{Context, Result};
use imageproc::image::{load_from_memory, DynamicImage};

/// Decode an encoded image from memory at its native resolution.
///
/// Format is sniffed from the bytes; no downscaling happens during
/// decode. Empty or malformed input fails here.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    load_from_memory(data).context("Failed to decode marker image bytes")
}
