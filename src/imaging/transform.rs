//! The transform engine: `(bytes, policy) -> bytes`.
//!
//! Purely functional — no state persists between calls. Decoding and
//! resizing go through the `image` crate (Lanczos3); JPEG output goes
//! through `jpeg-encoder` so chroma can stay at 4:4:4 (the `image` crate's
//! bundled encoder has no subsampling knob).
//!
//! Format policy: PNG sources stay PNG; every other decodable format is
//! re-encoded as JPEG at the policy quality.

use super::calculations::{cover_dimensions, plan_dimensions};
use super::params::{FitMode, ImageResolution};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use jpeg_encoder::{ColorType, Encoder as JpegEncoder, SamplingFactor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode derivative: {0}")]
    Encode(String),
    #[error("Derivative dimensions {width}x{height} exceed the JPEG limit")]
    TooLarge { width: u32, height: u32 },
}

/// Transform source image bytes according to a resolution policy.
///
/// Decodes, plans target dimensions (see
/// [`plan_dimensions`](super::plan_dimensions)), resizes per the policy fit
/// mode, and re-encodes.
pub fn transform(data: &[u8], policy: &ImageResolution) -> Result<Vec<u8>, TransformError> {
    let format = image::guess_format(data).map_err(TransformError::Decode)?;
    let img =
        image::load_from_memory_with_format(data, format).map_err(TransformError::Decode)?;

    let (width, height) = plan_dimensions(img.dimensions(), policy);
    let resized = apply_fit(&img, width, height, policy.fit);

    match format {
        ImageFormat::Png => encode_png(&resized),
        _ => encode_jpeg(&resized, policy.quality),
    }
}

/// Resize to the target box according to the fit mode.
fn apply_fit(img: &DynamicImage, width: u32, height: u32, fit: FitMode) -> DynamicImage {
    match fit {
        FitMode::Cover => img.resize_to_fill(width, height, FilterType::Lanczos3),
        FitMode::Fill => img.resize_exact(width, height, FilterType::Lanczos3),
        FitMode::Inside => img.resize(width, height, FilterType::Lanczos3),
        FitMode::Outside => {
            let (w, h) = cover_dimensions(img.dimensions(), (width, height));
            img.resize_exact(w, h, FilterType::Lanczos3)
        }
        FitMode::Contain => {
            // Letterbox: aspect-preserving resize centered on an exact-size
            // black canvas
            let inner = img.resize(width, height, FilterType::Lanczos3);
            let mut canvas =
                image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
            let x = i64::from((width - inner.width()) / 2);
            let y = i64::from((height - inner.height()) / 2);
            image::imageops::overlay(&mut canvas, &inner, x, y);
            DynamicImage::ImageRgba8(canvas)
        }
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, TransformError> {
    let mut out = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut out));
    img.write_with_encoder(encoder)
        .map_err(|e| TransformError::Encode(e.to_string()))?;
    Ok(out)
}

fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, TransformError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let w = u16::try_from(width).map_err(|_| TransformError::TooLarge { width, height })?;
    let h = u16::try_from(height).map_err(|_| TransformError::TooLarge { width, height })?;

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new(&mut out, quality.clamp(1, 100) as u8);
    encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
    encoder
        .encode(rgb.as_raw(), w, h, ColorType::Rgb)
        .map_err(|e| TransformError::Encode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_jpeg, test_png};

    fn policy(yaml: &str) -> ImageResolution {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn decoded(data: &[u8]) -> (ImageFormat, DynamicImage) {
        let format = image::guess_format(data).unwrap();
        (format, image::load_from_memory(data).unwrap())
    }

    #[test]
    fn jpeg_stays_jpeg_with_clamped_width() {
        let source = test_jpeg(100, 50);
        let out = transform(&source, &policy("width: 40")).unwrap();

        let (format, img) = decoded(&out);
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(img.dimensions(), (40, 20));
    }

    #[test]
    fn png_stays_png() {
        let source = test_png(64, 32);
        let out = transform(&source, &policy("width: 16")).unwrap();

        let (format, img) = decoded(&out);
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(img.dimensions(), (16, 8));
    }

    #[test]
    fn aspect_ratio_square_crop() {
        // 100x50 with 1:1 at width 40: plan gives 40x40, cover crops to fill
        let source = test_jpeg(100, 50);
        let out = transform(&source, &policy("width: 40\naspectRatio: \"1:1\"")).unwrap();

        let (_, img) = decoded(&out);
        assert_eq!(img.dimensions(), (40, 40));
    }

    #[test]
    fn contain_letterboxes_to_exact_box() {
        let source = test_jpeg(100, 50);
        let out =
            transform(&source, &policy("width: 40\naspectRatio: \"1:1\"\nfit: contain")).unwrap();

        let (_, img) = decoded(&out);
        assert_eq!(img.dimensions(), (40, 40));
    }

    #[test]
    fn inside_fits_within_box() {
        // Plan is 40x40 but inside preserves the 2:1 source aspect: 40x20
        let source = test_jpeg(100, 50);
        let out =
            transform(&source, &policy("width: 40\naspectRatio: \"1:1\"\nfit: inside")).unwrap();

        let (_, img) = decoded(&out);
        assert_eq!(img.dimensions(), (40, 20));
    }

    #[test]
    fn outside_covers_box() {
        // 2:1 source covering a 40x40 box: 80x40
        let source = test_jpeg(100, 50);
        let out =
            transform(&source, &policy("width: 40\naspectRatio: \"1:1\"\nfit: outside")).unwrap();

        let (_, img) = decoded(&out);
        assert_eq!(img.dimensions(), (80, 40));
    }

    #[test]
    fn never_upscales() {
        let source = test_jpeg(30, 20);
        let out = transform(&source, &policy("width: 400")).unwrap();

        let (_, img) = decoded(&out);
        assert_eq!(img.dimensions(), (30, 20));
    }

    #[test]
    fn invalid_bytes_are_a_decode_error() {
        let result = transform(b"not an image", &policy("width: 40"));
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn webp_reencodes_as_jpeg() {
        // Any non-PNG input lands in the JPEG-family branch
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            20,
            10,
            image::Rgb([10, 20, 30]),
        ));
        let mut source = Vec::new();
        img.write_with_encoder(image::codecs::webp::WebPEncoder::new_lossless(
            std::io::Cursor::new(&mut source),
        ))
        .unwrap();

        let out = transform(&source, &policy("width: 10")).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }
}
