//! Image-reference extraction from raw markdown.
//!
//! Two independent line-oriented scans over a post/page body:
//!
//! - **Content images**: per line, an HTML `<p><img src="...">` paragraph is
//!   tried first, then the markdown `![alt](path)` form. At most one
//!   extraction per line; the HTML form wins when both match.
//! - **Gallery images**: a stateful scan over `[gallery]` / `[/gallery]`
//!   markers (case-insensitive). Inside a gallery region, list items of the
//!   form `- [label](path)` contribute their path.
//!
//! Lines that match nothing are skipped silently — partial or incidental
//! matches in prose are expected and never an error. Paths are returned
//! verbatim, in document order, with empty captures filtered out.
//!
//! The matchers are deliberately a small explicit grammar (two line
//! classifiers plus one inline pattern) rather than regular expressions, so
//! the precedence and skip rules stay auditable in isolation.

use crate::types::PostMetadata;

/// Gallery scan state. The region is not nested: a second `[gallery]` while
/// inside one just re-sets the state.
enum GalleryState {
    Outside,
    Inside,
}

/// Extract inline content image paths from a markdown body, in document
/// order.
pub fn content_images(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| image_tag_src(line).or_else(|| image_md_path(line)))
        .map(str::to_string)
        .collect()
}

/// Extract gallery image paths from a markdown body, in document order.
///
/// A gallery left unterminated runs to the end of the document — that is
/// not an error.
pub fn gallery_images(content: &str) -> Vec<String> {
    let mut state = GalleryState::Outside;
    let mut images = Vec::new();

    for line in content.lines() {
        if gallery_open(line) {
            state = GalleryState::Inside;
            continue;
        }
        if gallery_close(line) {
            state = GalleryState::Outside;
            continue;
        }
        if let GalleryState::Inside = state {
            if let Some(path) = gallery_item_path(line) {
                images.push(path.to_string());
            }
        }
    }

    images
}

/// Content images across a collection of posts/pages, post order first.
pub fn content_images_from<'a>(
    posts: impl IntoIterator<Item = &'a PostMetadata>,
) -> Vec<String> {
    posts
        .into_iter()
        .flat_map(|p| content_images(&p.content))
        .collect()
}

/// Gallery images across a collection of posts/pages, post order first.
pub fn gallery_images_from<'a>(
    posts: impl IntoIterator<Item = &'a PostMetadata>,
) -> Vec<String> {
    posts
        .into_iter()
        .flat_map(|p| gallery_images(&p.content))
        .collect()
}

/// `<p><img ... src="..." ...></p>` — extract the quoted `src` value.
fn image_tag_src(line: &str) -> Option<&str> {
    let open = line.find("<p><img")?;
    let rest = &line[open + "<p><img".len()..];
    let close = rest.find('>')?;
    if !rest[close + 1..].starts_with("</p") {
        return None;
    }
    let attrs = &rest[..close];
    let src = attrs.find("src=\"")?;
    let value = &attrs[src + "src=\"".len()..];
    let end = value.find('"')?;
    let path = &value[..end];
    (!path.is_empty()).then_some(path)
}

/// `![alt](path)` — extract the path. Requires a non-empty alt.
fn image_md_path(line: &str) -> Option<&str> {
    let bang = line.find("![")?;
    let rest = &line[bang + 2..];
    let close = rest.find("](")?;
    if close == 0 {
        return None;
    }
    let after = &rest[close + 2..];
    let end = after.find(')')?;
    let path = &after[..end];
    (!path.is_empty()).then_some(path)
}

/// Line begins a gallery region: leading `[gallery]`, case-insensitive.
fn gallery_open(line: &str) -> bool {
    line.get(.."[gallery]".len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("[gallery]"))
}

/// Line ends a gallery region: `[/gallery]` anywhere, case-insensitive.
fn gallery_close(line: &str) -> bool {
    line.to_ascii_lowercase().contains("[/gallery]")
}

/// Gallery list item: `- [label](path)`. The label may be empty.
fn gallery_item_path(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        // A bare `-[...]` is not a list item; whitespace is required
        return None;
    }
    let after_bracket = trimmed.strip_prefix('[')?;
    let close = after_bracket.find("](")?;
    let after = &after_bracket[close + 2..];
    let end = after.find(')')?;
    let path = &after[..end];
    (!path.is_empty()).then_some(path)
}
