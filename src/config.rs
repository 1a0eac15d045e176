//! Pipeline configuration.
//!
//! Two YAML documents are expected in the project root:
//!
//! - `content-config.yaml` — folder names and per-theme resolution policies:
//!
//! ```yaml
//! contentsFolder: contents
//! pagesFolder: pages
//! postsFolder: posts
//! publicFolder: public
//! themeImageResolutions:
//!   paper:
//!     postThumbnail: { width: 400, aspectRatio: "1:1" }
//!     contentImage: { width: 1200, quality: 85 }
//!     galleryImage: { width: 1600, quality: 90 }
//!     galleryThumbnail: { width: 300, aspectRatio: "1:1", fit: cover }
//! ```
//!
//! - `ftp-config.yaml` — opaque publish credentials:
//!
//! ```yaml
//! host: ftp.example.com
//! user: deploy
//! password: hunter2
//! secure: true
//! uploadPath: /www/blog
//! ```
//!
//! Field names are camelCase on the wire. Unknown keys are rejected to catch
//! typos early.

use crate::imaging::ImageResolution;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Content configuration file name, resolved against the project root.
pub const CONTENT_CONFIG_FILE: &str = "content-config.yaml";
/// FTP configuration file name, resolved against the project root.
pub const FTP_CONFIG_FILE: &str = "ftp-config.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Content configuration: folder names plus the theme policy table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContentConfig {
    /// Public URL segment that image references carry but on-disk paths do
    /// not (stripped during source resolution).
    pub contents_folder: String,
    pub pages_folder: String,
    pub posts_folder: String,
    pub public_folder: String,
    /// Theme name → resolution policy bundle. Themes are processed in the
    /// order they appear in the config file.
    pub theme_image_resolutions: IndexMap<String, ThemeResolutions>,
}

/// Per-theme resolution policies. Absent categories are skipped entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ThemeResolutions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_thumbnail: Option<ImageResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_image: Option<ImageResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_image: Option<ImageResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_thumbnail: Option<ImageResolution>,
}

impl ThemeResolutions {
    fn policies(&self) -> [(&'static str, Option<&ImageResolution>); 4] {
        [
            ("postThumbnail", self.post_thumbnail.as_ref()),
            ("contentImage", self.content_image.as_ref()),
            ("galleryImage", self.gallery_image.as_ref()),
            ("galleryThumbnail", self.gallery_thumbnail.as_ref()),
        ]
    }
}

impl ContentConfig {
    /// Validate folder names and every theme policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("contentsFolder", &self.contents_folder),
            ("pagesFolder", &self.pages_folder),
            ("postsFolder", &self.posts_folder),
            ("publicFolder", &self.public_folder),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        for (theme, resolutions) in &self.theme_image_resolutions {
            for (category, policy) in resolutions.policies() {
                if let Some(policy) = policy {
                    policy.validate().map_err(|msg| {
                        ConfigError::Validation(format!("theme '{theme}' {category}: {msg}"))
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// FTP publish configuration. Opaque pass-through values for the publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FtpConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    /// Upgrade the connection to FTPS after connecting.
    pub secure: bool,
    pub upload_path: String,
}

/// Load and validate `content-config.yaml` from the project root.
pub fn load_content_config(root: &Path) -> Result<ContentConfig, ConfigError> {
    let raw = fs::read_to_string(root.join(CONTENT_CONFIG_FILE))?;
    let config: ContentConfig = serde_yaml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

/// Load `ftp-config.yaml` from the project root.
pub fn load_ftp_config(root: &Path) -> Result<FtpConfig, ConfigError> {
    let raw = fs::read_to_string(root.join(FTP_CONFIG_FILE))?;
    Ok(serde_yaml::from_str(&raw)?)
}
