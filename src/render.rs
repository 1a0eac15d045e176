//! Template rendering.
//!
//! Each output file comes from exactly one template rendered with exactly
//! one context key, so the surface here is a single function. Templates are
//! opaque: whatever they do with the value is their business.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error reading template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Render `template` with `value` bound to `key` in the context.
pub fn render_template<T: Serialize>(
    template: &Path,
    key: &str,
    value: &T,
) -> Result<String, RenderError> {
    let source = fs::read_to_string(template).map_err(|source| RenderError::Io {
        path: template.to_path_buf(),
        source,
    })?;
    let mut context = Context::new();
    context.insert(key, value);
    Ok(Tera::one_off(&source, &context, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use crate::types::ImageMap;
    use tempfile::TempDir;

    #[test]
    fn renders_value_under_key() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("maps.tera");
        write_file(
            &template,
            "{% for map in maps %}{{ map.from }} => {{ map.to }}\n{% endfor %}",
        );

        let maps = vec![ImageMap {
            from: "/contents/posts/a/pic.jpg".into(),
            to: "/contents/posts/a/paper-pic.jpg".into(),
        }];
        let rendered = render_template(&template, "maps", &maps).unwrap();
        assert_eq!(
            rendered,
            "/contents/posts/a/pic.jpg => /contents/posts/a/paper-pic.jpg\n"
        );
    }

    #[test]
    fn missing_template_is_io_error() {
        let result = render_template(Path::new("/nope/missing.tera"), "x", &1);
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }

    #[test]
    fn template_syntax_error_reported() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("bad.tera");
        write_file(&template, "{% for x in %}");

        let result = render_template(&template, "x", &1);
        assert!(matches!(result, Err(RenderError::Template(_))));
    }
}
