//! Content discovery: posts, pages, and the tag/category aggregations.
//!
//! Posts live one-per-directory at `{postsRoot}/{slug}/post.md` with a YAML
//! front matter block; pages are loose `.md` files anywhere under the pages
//! root. Both come back as [`PostMetadata`] so downstream stages treat them
//! uniformly (pages just carry empty tag/category lists).

use crate::types::{Category, PostCategory, PostMetadata, PostTag, Tag};
use chrono::NaiveDate;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Front matter date format: `dd-mm-yyyy`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const POST_FILE: &str = "post.md";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Front matter parse error in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Missing front matter in {0}")]
    MissingFrontMatter(PathBuf),
    #[error("Invalid date '{value}' in {path} (expected dd-mm-yyyy)")]
    InvalidDate { path: PathBuf, value: String },
}

/// Raw front matter attributes. Everything is optional in the file; absent
/// fields come back empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostAttributes {
    title: String,
    date: String,
    tags: String,
    category: String,
    image: String,
    description: String,
}

/// Split a document into `(front matter, body)`.
///
/// The front matter is a leading `---` line, YAML, and a closing `---`
/// line. Returns `None` when the document does not start with the opening
/// fence or the closing fence never arrives.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;
    for fence in ["\n---\n", "\n---\r\n"] {
        if let Some(at) = rest.find(fence) {
            return Some((&rest[..at], &rest[at + fence.len()..]));
        }
    }
    // Closing fence at end of document without a trailing newline
    rest.strip_suffix("\n---")
        .map(|front| (front, ""))
}

/// Discover every post under `posts_root`, newest first.
///
/// A post is a direct subdirectory containing `post.md`; directories without
/// one are skipped. The directory name is the slug. Ordering is by front
/// matter date descending, slug ascending as the tiebreak.
pub fn posts(
    posts_root: &Path,
    contents_folder: &str,
    posts_folder: &str,
) -> Result<Vec<PostMetadata>, ScanError> {
    let mut found = Vec::new();

    let mut entries: Vec<PathBuf> = fs::read_dir(posts_root)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    entries.sort();

    for dir in entries {
        let post_file = dir.join(POST_FILE);
        if !post_file.is_file() {
            continue;
        }
        let Some(slug) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let document = fs::read_to_string(&post_file)?;
        let (attributes, body) = parse_document(&document, &post_file)?;
        found.push(post_metadata(
            attributes,
            body,
            slug,
            contents_folder,
            posts_folder,
            &post_file,
        )?);
    }

    found.sort_by(|a, b| {
        let a_date = parsed_date(&a.date);
        let b_date = parsed_date(&b.date);
        b_date.cmp(&a_date).then_with(|| a.slug.cmp(&b.slug))
    });
    Ok(found)
}

/// Discover every page under `pages_root`: any `.md` file, recursively,
/// in lexicographic path order. The slug is the file's path relative to the
/// pages root, extension stripped.
pub fn pages(pages_root: &Path) -> Result<Vec<PostMetadata>, ScanError> {
    let mut found = Vec::new();

    for entry in WalkDir::new(pages_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let document = fs::read_to_string(entry.path())?;
        let (attributes, body) = parse_document(&document, entry.path())?;

        let slug = entry
            .path()
            .strip_prefix(pages_root)
            .unwrap_or(entry.path())
            .with_extension("")
            .to_string_lossy()
            .replace('\\', "/");

        found.push(PostMetadata {
            title: attributes.title,
            date: attributes.date,
            tags: Vec::new(),
            categories: Vec::new(),
            image: attributes.image,
            slug,
            description: attributes.description,
            content: body.to_string(),
        });
    }

    Ok(found)
}

/// Aggregate categories across posts, in first-appearance order per name,
/// with member slugs in post order.
pub fn categories(posts: &[PostMetadata]) -> Vec<Category> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: BTreeMap<String, Category> = BTreeMap::new();

    for post in posts {
        for category in &post.categories {
            let entry = by_id.entry(category.id.clone()).or_insert_with(|| {
                order.push(category.id.clone());
                Category {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    slugs: Vec::new(),
                }
            });
            entry.slugs.push(post.slug.clone());
        }
    }

    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}

/// Aggregate tags across posts, in first-appearance order.
pub fn tags(posts: &[PostMetadata]) -> Vec<Tag> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: BTreeMap<String, Tag> = BTreeMap::new();

    for post in posts {
        for tag in &post.tags {
            let entry = by_id.entry(tag.id.clone()).or_insert_with(|| {
                order.push(tag.id.clone());
                Tag {
                    id: tag.id.clone(),
                    name: tag.name.clone(),
                    slugs: Vec::new(),
                }
            });
            entry.slugs.push(post.slug.clone());
        }
    }

    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}

/// Stable identifier for a tag/category name: first 16 bytes of the
/// SHA-256 of the lowercased name, hex-encoded.
pub fn name_id(name: &str) -> String {
    let digest = Sha256::digest(name.to_lowercase().as_bytes());
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

fn parse_document<'a>(
    document: &'a str,
    path: &Path,
) -> Result<(PostAttributes, &'a str), ScanError> {
    let (front, body) = split_front_matter(document)
        .ok_or_else(|| ScanError::MissingFrontMatter(path.to_path_buf()))?;
    let attributes: PostAttributes =
        serde_yaml::from_str(front).map_err(|source| ScanError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((attributes, body))
}

fn post_metadata(
    attributes: PostAttributes,
    body: &str,
    slug: &str,
    contents_folder: &str,
    posts_folder: &str,
    path: &Path,
) -> Result<PostMetadata, ScanError> {
    if parsed_date(&attributes.date).is_none() {
        return Err(ScanError::InvalidDate {
            path: path.to_path_buf(),
            value: attributes.date,
        });
    }

    let image = if attributes.image.is_empty() {
        String::new()
    } else {
        format!(
            "/{}",
            [contents_folder, posts_folder, slug, &attributes.image].join("/")
        )
    };

    Ok(PostMetadata {
        title: attributes.title,
        date: attributes.date,
        tags: split_names(&attributes.tags)
            .into_iter()
            .map(|name| {
                let name = name.to_lowercase();
                PostTag {
                    id: name_id(&name),
                    name,
                }
            })
            .collect(),
        categories: split_names(&attributes.category)
            .into_iter()
            .map(|name| PostCategory {
                id: name_id(&name),
                name,
            })
            .collect(),
        image,
        slug: slug.to_string(),
        description: attributes.description,
        content: body.to_string(),
    })
}

/// Comma-separated list field: split, trim, drop empties.
fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parsed_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
