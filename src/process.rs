//! Derivative generation: resolve image references, run them through a
//! backend, and record the reference mapping.
//!
//! References are site-absolute paths like `/{contents}/{posts}/{slug}/x.jpg`;
//! on disk the `{contents}` segment does not exist, so resolution strips it.
//! Derivatives land next to their source in the staging tree, named
//! `{prefix}-{basename}`, and each processed reference yields an
//! [`ImageMap`] entry for the templates.
//!
//! Processing is sequential and fail-fast: the first missing source or
//! transform failure aborts the batch.

use crate::config::ContentConfig;
use crate::extract;
use crate::imaging::{ImageBackend, ImageResolution, TransformError};
use crate::output;
use crate::types::{ImageMap, PostMetadata};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Transform failed in batch '{prefix}' for {path}: {source}")]
    Transform {
        prefix: String,
        path: PathBuf,
        source: TransformError,
    },
    #[error("Source image not found in batch '{prefix}': {path}")]
    SourceNotFound { prefix: String, path: PathBuf },
}

/// Process one batch of content/gallery references against a policy.
///
/// Sources are read from the staging tree (they were copied there during
/// assembly) and derivatives are written beside them.
pub fn process_images<B: ImageBackend>(
    backend: &B,
    file_prefix: &str,
    images: &[String],
    policy: &ImageResolution,
    staging_root: &Path,
    contents_folder: &str,
) -> Result<Vec<ImageMap>, ProcessError> {
    let mut maps = Vec::new();

    for reference in dedupe(images) {
        let segments = reference_segments(reference, contents_folder);
        let source: PathBuf = staging_root.join(segments.join("/"));
        if !source.is_file() {
            return Err(ProcessError::SourceNotFound {
                prefix: file_prefix.to_string(),
                path: source,
            });
        }

        let name = derivative_name(file_prefix, reference);
        let destination = source.with_file_name(&name);
        output::print_image_map(reference, &destination);

        let data = fs::read(&source)?;
        let derived = backend
            .transform(&data, policy)
            .map_err(|source_err| ProcessError::Transform {
                prefix: file_prefix.to_string(),
                path: source.clone(),
                source: source_err,
            })?;
        fs::write(&destination, derived)?;

        maps.push(ImageMap {
            from: reference.clone(),
            to: derivative_reference(reference, &name),
        });
    }

    Ok(maps)
}

/// Process the per-post thumbnail images.
///
/// Unlike content/gallery batches, thumbnails read from the original source
/// tree and write into the staging tree, so they work even before the post
/// directories are staged.
pub fn process_post_thumbnails<B: ImageBackend>(
    backend: &B,
    file_prefix: &str,
    posts: &[PostMetadata],
    policy: &ImageResolution,
    source_root: &Path,
    staging_root: &Path,
    contents_folder: &str,
    posts_folder: &str,
) -> Result<Vec<ImageMap>, ProcessError> {
    let references: Vec<String> = posts
        .iter()
        .filter(|p| !p.image.is_empty())
        .map(|p| p.image.clone())
        .collect();
    let mut maps = Vec::new();

    for reference in dedupe(&references) {
        let segments = reference_segments(reference, contents_folder);
        let source: PathBuf = source_root.join(segments.join("/"));
        if !source.is_file() {
            return Err(ProcessError::SourceNotFound {
                prefix: file_prefix.to_string(),
                path: source,
            });
        }

        let name = derivative_name(file_prefix, reference);
        // segments = [posts_folder, slug, file]; derivative goes beside
        // the staged copy of the file
        debug_assert!(segments.first().map(String::as_str) == Some(posts_folder));
        let mut destination = staging_root.to_path_buf();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            destination.push(segment);
        }
        destination.push(&name);
        output::print_image_map(reference, &destination);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = fs::read(&source)?;
        let derived = backend
            .transform(&data, policy)
            .map_err(|source_err| ProcessError::Transform {
                prefix: file_prefix.to_string(),
                path: source.clone(),
                source: source_err,
            })?;
        fs::write(&destination, derived)?;

        maps.push(ImageMap {
            from: reference.clone(),
            to: derivative_reference(reference, &name),
        });
    }

    Ok(maps)
}

/// Run every configured image category for one theme.
///
/// Returns category key → ordered image maps; categories without a policy
/// are absent from the result. Keys match the template contract, in the
/// fixed category order (thumbnail, content, gallery, gallery thumb).
#[allow(clippy::too_many_arguments)]
pub fn process_theme<B: ImageBackend>(
    backend: &B,
    theme: &str,
    resolutions: &crate::config::ThemeResolutions,
    posts: &[PostMetadata],
    pages: &[PostMetadata],
    source_root: &Path,
    staging_root: &Path,
    config: &ContentConfig,
) -> Result<IndexMap<&'static str, Vec<ImageMap>>, ProcessError> {
    let mut result = IndexMap::new();

    if let Some(policy) = &resolutions.post_thumbnail {
        let maps = process_post_thumbnails(
            backend,
            &format!("{theme}-thumbnail"),
            posts,
            policy,
            source_root,
            staging_root,
            &config.contents_folder,
            &config.posts_folder,
        )?;
        result.insert("postThumbnail", maps);
    }

    if let Some(policy) = &resolutions.content_image {
        let references = extract::content_images_from(posts.iter().chain(pages.iter()));
        let maps = process_images(
            backend,
            theme,
            &references,
            policy,
            staging_root,
            &config.contents_folder,
        )?;
        result.insert("contentImage", maps);
    }

    if let Some(policy) = &resolutions.gallery_image {
        let references = extract::gallery_images_from(posts.iter().chain(pages.iter()));
        let maps = process_images(
            backend,
            &format!("{theme}-gallery"),
            &references,
            policy,
            staging_root,
            &config.contents_folder,
        )?;
        result.insert("galleryImage", maps);
    }

    if let Some(policy) = &resolutions.gallery_thumbnail {
        let references = extract::gallery_images_from(posts.iter().chain(pages.iter()));
        let maps = process_images(
            backend,
            &format!("{theme}-gallery-thumb"),
            &references,
            policy,
            staging_root,
            &config.contents_folder,
        )?;
        result.insert("galleryThumbnail", maps);
    }

    Ok(result)
}

/// Path segments of a reference, with empties and the public contents
/// segment stripped.
fn reference_segments(reference: &str, contents_folder: &str) -> Vec<String> {
    reference
        .split('/')
        .filter(|s| !s.is_empty() && *s != contents_folder)
        .map(str::to_string)
        .collect()
}

/// `{prefix}-{basename}` for a reference's final segment.
fn derivative_name(prefix: &str, reference: &str) -> String {
    let basename = reference.rsplit('/').next().unwrap_or(reference);
    format!("{prefix}-{basename}")
}

/// The derivative's public reference: the original with its basename
/// swapped.
fn derivative_reference(reference: &str, name: &str) -> String {
    match reference.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{name}"),
        None => name.to_string(),
    }
}

/// First-occurrence-order dedupe over a batch of references.
fn dedupe(references: &[String]) -> Vec<&String> {
    let mut seen = HashSet::new();
    references.iter().filter(|r| seen.insert(r.as_str())).collect()
}
