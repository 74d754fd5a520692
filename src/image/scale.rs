//! Exact-dimension resampling

use anyhow::{ensure, Context, Result};
use fast_image_resize as fr;
use fr::images::Image as FrImage;
use imageproc::image::{DynamicImage, RgbaImage};

/// Resampling filter applied when producing the target buffer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ScaleFilter {
    /// Nearest-neighbor, no smoothing
    Nearest,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ScaleFilter {
    fn resize_alg(self) -> fr::ResizeAlg {
        match self {
            ScaleFilter::Nearest => fr::ResizeAlg::Nearest,
            ScaleFilter::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            ScaleFilter::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            ScaleFilter::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}

/// Resample to exactly `width` x `height` pixels, ignoring the source
/// aspect ratio. Non-positive targets are rejected before the resampler
/// sees them.
pub(super) fn resize_exact(
    img: &DynamicImage,
    width: i32,
    height: i32,
    filter: ScaleFilter,
) -> Result<DynamicImage> {
    ensure!(
        width > 0 && height > 0,
        "Target dimensions must be positive, got {width}x{height}"
    );
    let (width, height) = (width as u32, height as u32);

    let src = img.to_rgba8();
    let (src_width, src_height) = src.dimensions();

    let src_image = FrImage::from_vec_u8(src_width, src_height, src.into_raw(), fr::PixelType::U8x4)
        .context("Failed to build source image buffer")?;

    let mut dst_buffer = vec![0u8; width as usize * height as usize * 4];
    let mut dst_image = FrImage::from_slice_u8(width, height, &mut dst_buffer, fr::PixelType::U8x4)
        .context("Failed to build destination image buffer")?;

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(
            &src_image,
            &mut dst_image,
            Some(&fr::ResizeOptions::new().resize_alg(filter.resize_alg())),
        )
        .context("Resampling failed")?;

    let resized = RgbaImage::from_raw(width, height, dst_buffer)
        .context("Resized buffer has unexpected length")?;

    Ok(DynamicImage::ImageRgba8(resized))
}

#[test]
fn resize_rejects_non_positive_dimensions() {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));

    assert!(resize_exact(&img, 0, 2, ScaleFilter::Nearest).is_err());
    assert!(resize_exact(&img, 2, -1, ScaleFilter::Nearest).is_err());
}

#[test]
fn nearest_upscale_replicates_pixels() {
    use imageproc::image::Rgba;

    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

    let scaled = resize_exact(&DynamicImage::ImageRgba8(img), 4, 2, ScaleFilter::Nearest).unwrap();
    let rgba = scaled.to_rgba8();

    assert_eq!(rgba.dimensions(), (4, 2));
    assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(rgba.get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert_eq!(rgba.get_pixel(2, 0).0, [0, 0, 255, 255]);
    assert_eq!(rgba.get_pixel(3, 1).0, [0, 0, 255, 255]);
}
