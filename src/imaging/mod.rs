//! Image transformation — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (JPEG, PNG, TIFF, WebP) | `image` crate |
//! | **Resize** | Lanczos3 via `image::imageops` |
//! | **Encode PNG** | `image::codecs::png::PngEncoder` |
//! | **Encode JPEG** | `jpeg-encoder` (quality + 4:4:4 chroma) |
//!
//! The module is split into:
//! - **Params**: policy types supplied by configuration
//! - **Calculations**: pure dimension math (unit testable)
//! - **Transform**: the `(bytes, policy) -> bytes` engine
//! - **Backend**: [`ImageBackend`] seam so orchestration is testable

pub mod backend;
mod calculations;
pub mod params;
pub mod transform;

pub use backend::{CodecBackend, ImageBackend};
pub use calculations::{cover_dimensions, plan_dimensions};
pub use params::{AspectRatio, FitMode, ImageResolution};
pub use transform::{TransformError, transform};
