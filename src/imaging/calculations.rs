//! Pure calculation functions for derivative dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::ImageResolution;

/// Compute the target dimensions for a source image under a policy.
///
/// The computation is deliberately two-stage and must stay that way — themes
/// depend on the exact numbers it produces:
///
/// 1. If the policy carries an aspect ratio `W:H`, the height becomes
///    `floor(source_width * H / W)`, using the *pre-clamp* width as the base.
/// 2. The width is clamped to `min(policy.width, source_width)` — derivatives
///    never upscale.
/// 3. The height is then re-derived as `floor(height * width / source_width)`,
///    scaling proportionally against the *original* width.
///
/// # Examples
/// ```
/// # use inkpress::imaging::{ImageResolution, plan_dimensions};
/// let policy: ImageResolution = serde_yaml::from_str("width: 400").unwrap();
/// assert_eq!(plan_dimensions((1000, 500), &policy), (400, 200));
/// ```
pub fn plan_dimensions(source: (u32, u32), policy: &ImageResolution) -> (u32, u32) {
    let (source_w, source_h) = source;
    if source_w == 0 {
        return source;
    }

    let mut width = source_w;
    let mut height = source_h;

    if let Some(ratio) = policy.aspect_ratio {
        height = ((u64::from(ratio.height) * u64::from(width)) / u64::from(ratio.width)) as u32;
    }

    if policy.width < width {
        width = policy.width;
    }

    height = ((u64::from(height) * u64::from(width)) / u64::from(source_w)) as u32;

    (width, height)
}

/// Smallest aspect-preserving dimensions that cover a target box.
///
/// One dimension matches the target exactly, the other may exceed it. Used
/// by the `outside` fit mode.
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height matches, width exceeds
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w, h)
    } else {
        // Source is taller: width matches, height exceeds
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h)
    }
}
