//! Image processing pipeline for marker icon rescaling

mod decode;
mod encode;
mod scale;

// Re-export public API
pub use encode::{compress_to_png, PngCompression};
pub use scale::ScaleFilter;

use anyhow::Result;
use imageproc::image::GenericImageView;

use crate::marker::ScaleConfig;

/// Decode an encoded image, resample it to exactly `width` x `height`
/// pixels, and re-encode it as PNG.
///
/// The source aspect ratio is not preserved; the caller gets exactly the
/// dimensions it asked for.
pub fn rescale(data: &[u8], width: i32, height: i32, config: &ScaleConfig) -> Result<Vec<u8>> {
    let img = decode::decode(data)?;

    let (src_width, src_height) = img.dimensions();
    log::debug!("Rescaling marker: {src_width}x{src_height} -> {width}x{height}");

    let scaled = scale::resize_exact(&img, width, height, config.filter)?;
    encode::encode_png(&scaled, config.compression)
}

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    use imageproc::image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[test]
fn rescale_produces_exact_dimensions() {
    let input = test_png(10, 10, [255, 0, 0, 255]);
    let output = rescale(&input, 3, 7, &ScaleConfig::default()).unwrap();

    let img = imageproc::image::load_from_memory(&output).unwrap();
    assert_eq!(img.dimensions(), (3, 7));
}

#[test]
fn rescale_rejects_empty_input() {
    assert!(rescale(&[], 10, 10, &ScaleConfig::default()).is_err());
}

#[test]
fn rescale_rejects_garbage_input() {
    assert!(rescale(&[0, 1, 2, 3, 4], 10, 10, &ScaleConfig::default()).is_err());
}
