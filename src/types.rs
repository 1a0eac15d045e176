//! Shared types used across the pipeline stages.
//!
//! These are serialized into template contexts (posts, categories, tags,
//! image maps), so their field names are part of the template contract.

use serde::{Deserialize, Serialize};

/// A tag attached to a post: stable hex id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTag {
    pub id: String,
    pub name: String,
}

/// A category attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCategory {
    pub id: String,
    pub name: String,
}

/// One discovered post or page, immutable once constructed.
///
/// Pages reuse this shape with empty tag/category lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetadata {
    pub title: String,
    /// Publication date in `dd-mm-yyyy` form, as written in the front matter.
    pub date: String,
    pub tags: Vec<PostTag>,
    pub categories: Vec<PostCategory>,
    /// Site-absolute reference to the post image
    /// (`/{contents}/{posts}/{slug}/{file}`).
    pub image: String,
    /// Unique per post: the post's directory name (pages: relative path).
    pub slug: String,
    pub description: String,
    /// Raw markdown body (front matter stripped).
    pub content: String,
}

/// A tag aggregated across posts, with the slugs of every post carrying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slugs: Vec<String>,
}

/// A category aggregated across posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slugs: Vec<String>,
}

/// Maps an original image reference to its generated derivative reference.
///
/// Produced per theme/category batch; the ordered list of these is the
/// template input for path rewriting on the published site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMap {
    pub from: String,
    pub to: String,
}
