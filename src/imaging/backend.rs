//! Image backend trait.
//!
//! The [`ImageBackend`] trait is the seam between the batch orchestrator
//! (which decides what to process and where results go) and the codecs
//! (which do the pixel work). Production uses [`CodecBackend`]; tests swap
//! in a recording mock so orchestration logic runs without decoding a
//! single image.

use super::params::ImageResolution;
use super::transform::{self, TransformError};

/// Trait for image transform backends.
pub trait ImageBackend {
    /// Transform source bytes according to a resolution policy.
    fn transform(&self, data: &[u8], policy: &ImageResolution)
    -> Result<Vec<u8>, TransformError>;
}

/// Production backend: pure-Rust codecs via [`transform::transform`].
#[derive(Default)]
pub struct CodecBackend;

impl CodecBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for CodecBackend {
    fn transform(
        &self,
        data: &[u8],
        policy: &ImageResolution,
    ) -> Result<Vec<u8>, TransformError> {
        transform::transform(data, policy)
    }
}
