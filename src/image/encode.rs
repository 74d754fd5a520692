//! PNG encoding

use anyhow::{Context, Result};
use imageproc::image::{ColorType, DynamicImage, GenericImageView};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

/// Compress an image to PNG format with the specified compression level
pub fn compress_to_png<W>(
    img: &DynamicImage,
    writer: &mut W,
    compression: PngCompression,
) -> Result<()>
where
    W: std::io::Write,
{
    use imageproc::image::codecs::png::{CompressionType, FilterType, PngEncoder};
    use imageproc::image::ImageEncoder;

    let compression_type = match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    };

    let is_grayscale = img.color() == ColorType::L8 || img.color() == ColorType::La8;

    let encoder = PngEncoder::new_with_quality(
        writer,
        compression_type,
        if is_grayscale {
            FilterType::NoFilter
        } else {
            FilterType::Adaptive
        },
    );

    encoder
        .write_image(
            img.as_bytes(),
            img.width(),
            img.height(),
            img.color().into(),
        )
        .with_context(|| "Failed to compress image to PNG")?;

    Ok(())
}

/// Encode into a fresh in-memory byte buffer.
pub(super) fn encode_png(img: &DynamicImage, compression: PngCompression) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut buffer = Vec::with_capacity((width as usize) * (height as usize));

    compress_to_png(img, &mut buffer, compression)?;

    log::trace!("Encoded marker image: {width}x{height}, {} bytes", buffer.len());
    Ok(buffer)
}

#[test]
fn encoded_png_decodes_back() {
    use imageproc::image::RgbaImage;

    let img = DynamicImage::ImageRgba8(RgbaImage::new(5, 3));
    let bytes = encode_png(&img, PngCompression::Default).unwrap();

    let decoded = imageproc::image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (5, 3));
}
