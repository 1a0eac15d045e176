//! Console output helpers.
//!
//! All progress reporting goes through here so the format stays uniform and
//! the formatting functions stay testable without capturing stdout.

use crate::pipeline::BuildSummary;
use std::path::Path;

/// Announce a pipeline stage.
pub fn print_stage(name: &str) {
    println!("==> {name}");
}

/// Announce the start of a theme's image processing.
pub fn print_theme(theme: &str) {
    println!("==> Processing theme '{theme}'");
}

pub fn format_image_map(from: &str, destination: &Path) -> String {
    format!("  - {from} -> {}", destination.display())
}

/// One line per generated derivative.
pub fn print_image_map(from: &str, destination: &Path) {
    println!("{}", format_image_map(from, destination));
}

pub fn format_build_summary(summary: &BuildSummary) -> String {
    format!(
        "==> Built {} posts, {} pages, {} themes",
        summary.posts, summary.pages, summary.themes
    )
}

pub fn print_build_summary(summary: &BuildSummary) {
    println!("{}", format_build_summary(summary));
}
