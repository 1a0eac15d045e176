//! The build pipeline: scan, render, stage, derive.
//!
//! A build runs these stages in order against a fresh staging directory:
//!
//! 1. Scan posts and render the listing outputs (`posts.php`,
//!    `categories.php`, `tags.php`).
//! 2. Copy pages, public assets, and post directories into staging, along
//!    with the root `intro.md` and `main-menu.json` when present.
//! 3. Scan pages and, per configured theme, generate every image derivative
//!    and render that theme's `{theme}-image-maps.php`.
//!
//! Stages run sequentially; the first error aborts the build with the
//! staging directory left as-is for inspection.

use crate::config::ContentConfig;
use crate::imaging::{CodecBackend, ImageBackend};
use crate::output;
use crate::process::{self, ProcessError};
use crate::render::{self, RenderError};
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Directory under the project root holding the `.tera` templates.
pub const TEMPLATES_DIR: &str = "templates";

const INTRO_FILE: &str = "intro.md";
const MENU_FILE: &str = "main-menu.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid main-menu.json: {0}")]
    Menu(#[from] serde_json::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Counts reported after a successful build.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub posts: usize,
    pub pages: usize,
    pub themes: usize,
}

/// Run a full build with the production image backend.
pub fn build(
    root: &Path,
    staging: &Path,
    config: &ContentConfig,
) -> Result<BuildSummary, BuildError> {
    build_with_backend(&CodecBackend::new(), root, staging, config)
}

pub fn build_with_backend<B: ImageBackend>(
    backend: &B,
    root: &Path,
    staging: &Path,
    config: &ContentConfig,
) -> Result<BuildSummary, BuildError> {
    let templates = root.join(TEMPLATES_DIR);

    if staging.exists() {
        fs::remove_dir_all(staging)?;
    }
    fs::create_dir_all(staging)?;

    output::print_stage("Scanning posts");
    let posts_root = root.join(&config.posts_folder);
    let posts = scan::posts(&posts_root, &config.contents_folder, &config.posts_folder)?;

    output::print_stage("Rendering listings");
    let rendered = render::render_template(&templates.join("posts.tera"), "posts", &posts)?;
    fs::write(staging.join("posts.php"), rendered)?;
    let rendered = render::render_template(
        &templates.join("categories.tera"),
        "categories",
        &scan::categories(&posts),
    )?;
    fs::write(staging.join("categories.php"), rendered)?;
    let rendered =
        render::render_template(&templates.join("tags.tera"), "tags", &scan::tags(&posts))?;
    fs::write(staging.join("tags.php"), rendered)?;

    output::print_stage("Staging content");
    for folder in [
        &config.pages_folder,
        &config.public_folder,
        &config.posts_folder,
    ] {
        let source = root.join(folder);
        if source.is_dir() {
            copy_dir_recursive(&source, &staging.join(folder))?;
        }
    }
    let intro = root.join(INTRO_FILE);
    if intro.is_file() {
        fs::copy(&intro, staging.join(INTRO_FILE))?;
    }
    let menu = root.join(MENU_FILE);
    if menu.is_file() {
        // Catch a broken menu at build time rather than on the live site
        let raw = fs::read_to_string(&menu)?;
        serde_json::from_str::<serde_json::Value>(&raw)?;
        fs::copy(&menu, staging.join(MENU_FILE))?;
    }

    let pages_root = root.join(&config.pages_folder);
    let pages = if pages_root.is_dir() {
        scan::pages(&pages_root)?
    } else {
        Vec::new()
    };

    for (theme, resolutions) in &config.theme_image_resolutions {
        output::print_theme(theme);
        let maps = process::process_theme(
            backend,
            theme,
            resolutions,
            &posts,
            &pages,
            root,
            staging,
            config,
        )?;
        let rendered = render::render_template(
            &templates.join("image-maps.tera"),
            "imageMaps",
            &maps,
        )?;
        fs::write(staging.join(format!("{theme}-image-maps.php")), rendered)?;
    }

    Ok(BuildSummary {
        posts: posts.len(),
        pages: pages.len(),
        themes: config.theme_image_resolutions.len(),
    })
}

fn copy_dir_recursive(source: &Path, destination: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_content_config;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{test_jpeg, write_file};
    use tempfile::TempDir;

    const CONFIG: &str = "\
contentsFolder: contents
pagesFolder: pages
postsFolder: posts
publicFolder: public
themeImageResolutions:
  paper:
    postThumbnail:
      width: 64
    contentImage:
      width: 128
      quality: 80
";

    const POSTS_TPL: &str =
        "<?php\n$posts = [{% for p in posts %}\"{{ p.slug }}\",{% endfor %}];\n";
    const CATEGORIES_TPL: &str =
        "<?php\n$categories = [{% for c in categories %}\"{{ c.name }}\",{% endfor %}];\n";
    const TAGS_TPL: &str = "<?php\n$tags = [{% for t in tags %}\"{{ t.name }}\",{% endfor %}];\n";
    const MAPS_TPL: &str = "<?php\n{% for category, maps in imageMaps %}// {{ category }}\n{% for m in maps %}\"{{ m.from }}\" => \"{{ m.to }}\",\n{% endfor %}{% endfor %}";

    fn project(tmp: &TempDir) -> std::path::PathBuf {
        let root = tmp.path().join("site");
        write_file(&root.join("content-config.yaml"), CONFIG);
        write_file(&root.join("templates").join("posts.tera"), POSTS_TPL);
        write_file(
            &root.join("templates").join("categories.tera"),
            CATEGORIES_TPL,
        );
        write_file(&root.join("templates").join("tags.tera"), TAGS_TPL);
        write_file(&root.join("templates").join("image-maps.tera"), MAPS_TPL);
        write_file(
            &root.join("posts").join("trip").join("post.md"),
            "---\ntitle: Trip\ndate: 02-01-2024\ntags: travel\ncategory: Life\nimage: cover.jpg\n---\n![inline](/contents/posts/trip/inline.jpg)\n",
        );
        fs::write(
            root.join("posts").join("trip").join("cover.jpg"),
            test_jpeg(32, 32),
        )
        .unwrap();
        fs::write(
            root.join("posts").join("trip").join("inline.jpg"),
            test_jpeg(32, 32),
        )
        .unwrap();
        write_file(
            &root.join("pages").join("about.md"),
            "---\ntitle: About\n---\nAbout body\n",
        );
        write_file(&root.join("public").join("style.css"), "body {}");
        write_file(&root.join("intro.md"), "Hello there");
        write_file(
            &root.join("main-menu.json"),
            r#"[{"label": "About", "path": "/about"}]"#,
        );
        root
    }

    #[test]
    fn full_build_with_mock_backend() {
        let tmp = TempDir::new().unwrap();
        let root = project(&tmp);
        let staging = tmp.path().join("stage");
        let config = load_content_config(&root).unwrap();

        let backend = MockBackend::new();
        let summary = build_with_backend(&backend, &root, &staging, &config).unwrap();
        assert_eq!(summary.posts, 1);
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.themes, 1);

        let posts_php = fs::read_to_string(staging.join("posts.php")).unwrap();
        assert!(posts_php.contains("\"trip\""));
        let categories_php = fs::read_to_string(staging.join("categories.php")).unwrap();
        assert!(categories_php.contains("\"Life\""));
        let tags_php = fs::read_to_string(staging.join("tags.php")).unwrap();
        assert!(tags_php.contains("\"travel\""));

        // Staged copies and assets
        assert!(staging.join("posts").join("trip").join("post.md").is_file());
        assert!(staging.join("pages").join("about.md").is_file());
        assert!(staging.join("public").join("style.css").is_file());
        assert!(staging.join("intro.md").is_file());
        assert!(staging.join("main-menu.json").is_file());

        // Derivatives beside the staged sources
        assert!(staging
            .join("posts")
            .join("trip")
            .join("paper-thumbnail-cover.jpg")
            .is_file());
        assert!(staging
            .join("posts")
            .join("trip")
            .join("paper-inline.jpg")
            .is_file());

        let maps_php = fs::read_to_string(staging.join("paper-image-maps.php")).unwrap();
        assert!(maps_php.contains("// contentImage"));
        assert!(maps_php.contains(
            "\"/contents/posts/trip/inline.jpg\" => \"/contents/posts/trip/paper-inline.jpg\""
        ));
        assert!(maps_php.contains("// postThumbnail"));
        // Thumbnail maps render before content maps, matching category order
        let thumb_at = maps_php.find("// postThumbnail").unwrap();
        let content_at = maps_php.find("// contentImage").unwrap();
        assert!(thumb_at < content_at, "got:\n{maps_php}");

        // thumbnail + content image
        assert_eq!(backend.get_operations().len(), 2);
    }

    #[test]
    fn build_with_real_codec_backend() {
        let tmp = TempDir::new().unwrap();
        let root = project(&tmp);
        let staging = tmp.path().join("stage");
        let config = load_content_config(&root).unwrap();

        build(&root, &staging, &config).unwrap();

        let derived = fs::read(
            staging
                .join("posts")
                .join("trip")
                .join("paper-thumbnail-cover.jpg"),
        )
        .unwrap();
        let decoded = image::load_from_memory(&derived).unwrap();
        // 32px source never upscales past its own width
        assert_eq!(decoded.width(), 32);
    }

    #[test]
    fn broken_menu_fails_the_build() {
        let tmp = TempDir::new().unwrap();
        let root = project(&tmp);
        write_file(&root.join("main-menu.json"), "{not json");
        let staging = tmp.path().join("stage");
        let config = load_content_config(&root).unwrap();

        let result = build_with_backend(&MockBackend::new(), &root, &staging, &config);
        assert!(matches!(result, Err(BuildError::Menu(_))));
    }

    #[test]
    fn rebuild_replaces_staging_directory() {
        let tmp = TempDir::new().unwrap();
        let root = project(&tmp);
        let staging = tmp.path().join("stage");
        write_file(&staging.join("stale.txt"), "old run");
        let config = load_content_config(&root).unwrap();

        build_with_backend(&MockBackend::new(), &root, &staging, &config).unwrap();
        assert!(!staging.join("stale.txt").exists());
    }
}
