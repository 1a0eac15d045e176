//! Resolution policy types for derivative generation.
//!
//! These structs describe *what* to produce, not *how* to produce it. They
//! arrive from configuration (one bundle per theme) and are handed unchanged
//! to the transform engine.
//!
//! ## Types
//!
//! - [`ImageResolution`] — one derivative policy: target width, optional
//!   aspect ratio, quality (default 100), fit mode (default cover).
//! - [`AspectRatio`] — a `"W:H"` ratio, parsed and validated on load.
//! - [`FitMode`] — how the resized image meets the target box.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A `"W:H"` aspect ratio from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| format!("expected \"W:H\", got {s:?}"))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid aspect ratio width {w:?}"))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid aspect ratio height {h:?}"))?;
        if width == 0 || height == 0 {
            return Err(format!("aspect ratio components must be non-zero: {s:?}"));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl Serialize for AspectRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How a resized image meets the target box.
///
/// `Cover` (the default) crops to fill the exact box preserving aspect;
/// `Contain` letterboxes onto the exact box; `Fill` stretches; `Inside` and
/// `Outside` preserve aspect while fitting within / covering the box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Fill,
    Contain,
    #[default]
    Cover,
    Inside,
    Outside,
}

/// One derivative policy, as configured per theme and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageResolution {
    /// Target width. Never upscales: clamped to the source width at plan time.
    pub width: u32,
    /// Optional `"W:H"` ratio applied to the pre-clamp width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    /// Lossy encoding quality (1-100). Ignored for PNG output.
    #[serde(default = "default_quality")]
    pub quality: u32,
    #[serde(default)]
    pub fit: FitMode,
}

fn default_quality() -> u32 {
    100
}

impl ImageResolution {
    /// Check policy values are usable. Returns a message naming the problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 {
            return Err("width must be positive".into());
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(format!("quality must be 1-100, got {}", self.quality));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_parses() {
        let ar: AspectRatio = "16:9".parse().unwrap();
        assert_eq!(ar, AspectRatio { width: 16, height: 9 });
    }

    #[test]
    fn aspect_ratio_rejects_garbage() {
        assert!("16x9".parse::<AspectRatio>().is_err());
        assert!("0:1".parse::<AspectRatio>().is_err());
        assert!(":9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn aspect_ratio_roundtrips_display() {
        let ar: AspectRatio = "4:5".parse().unwrap();
        assert_eq!(ar.to_string(), "4:5");
    }

    #[test]
    fn resolution_defaults_from_yaml() {
        let res: ImageResolution = serde_yaml::from_str("width: 400").unwrap();
        assert_eq!(res.width, 400);
        assert_eq!(res.quality, 100);
        assert_eq!(res.fit, FitMode::Cover);
        assert!(res.aspect_ratio.is_none());
    }

    #[test]
    fn resolution_full_yaml() {
        let res: ImageResolution =
            serde_yaml::from_str("width: 720\naspectRatio: \"1:1\"\nquality: 80\nfit: inside\n")
                .unwrap();
        assert_eq!(res.aspect_ratio, Some(AspectRatio { width: 1, height: 1 }));
        assert_eq!(res.quality, 80);
        assert_eq!(res.fit, FitMode::Inside);
    }

    #[test]
    fn resolution_rejects_unknown_keys() {
        let res: Result<ImageResolution, _> = serde_yaml::from_str("width: 400\nheigth: 300\n");
        assert!(res.is_err());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut res: ImageResolution = serde_yaml::from_str("width: 400").unwrap();
        res.width = 0;
        assert!(res.validate().is_err());
        res.width = 400;
        res.quality = 101;
        assert!(res.validate().is_err());
        res.quality = 100;
        assert!(res.validate().is_ok());
    }
}
