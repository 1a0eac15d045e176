//! Shared test fixtures.

use crate::types::PostMetadata;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs;
use std::path::Path;

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A post with the given slug and markdown body; other fields are
/// placeholder values.
pub fn post_with_content(slug: &str, content: &str) -> PostMetadata {
    PostMetadata {
        title: format!("Post {slug}"),
        date: "01-01-2024".to_string(),
        tags: Vec::new(),
        categories: Vec::new(),
        image: String::new(),
        slug: slug.to_string(),
        description: String::new(),
        content: content.to_string(),
    }
}

/// A post with the given slug and post image reference.
pub fn post_with_image(slug: &str, image: &str) -> PostMetadata {
    let mut post = post_with_content(slug, "");
    post.image = image.to_string();
    post
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// An in-memory JPEG of the given dimensions.
pub fn test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// An in-memory PNG of the given dimensions.
pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}
