//! inkpress — a static content pipeline with themed image derivatives.
//!
//! The pipeline turns a directory of markdown posts and pages into a
//! PHP-templated site: it scans front matter, extracts image references
//! from post bodies, generates resized derivatives per configured theme,
//! renders listing and image-map outputs through Tera templates, and can
//! mirror the result to a host over FTP.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`config`] | YAML configuration (content + FTP) |
//! | [`scan`] | Post/page discovery, front matter, tags/categories |
//! | [`extract`] | Image-reference extraction from markdown |
//! | [`imaging`] | Resolution policies, dimension math, codecs |
//! | [`process`] | Derivative batches and image maps |
//! | [`render`] | Tera template rendering |
//! | [`pipeline`] | Build orchestration and staging assembly |
//! | [`publish`] | FTP/FTPS upload |
//! | [`output`] | Console progress reporting |
//!
//! Design notes:
//! - Processing is sequential and fail-fast; a build either completes or
//!   stops at the first error with staging left for inspection.
//! - Templates are opaque: each output is one template rendered with one
//!   context key.
//! - Derivatives are named `{prefix}-{basename}` and live beside their
//!   source, so image maps are pure basename swaps.

pub mod config;
pub mod extract;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod publish;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
