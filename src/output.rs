//! CLI output formatting.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! Paths are shown relative to the project root when they live under it.
//!
//! ## Build
//!
//! ```text
//! digital-meetup (2 posters)
//!     Template: templates/digital-meetup.svg
//!     Producing build/2024/digital-meetup/digital-meetup-2024-05-01-18:00.png...
//!     Produced digital-meetup (2024) 05-01 @ 18:00
//! ...
//! Generated 2 posters, published 4 template files → build
//! ```
//!
//! ## Check
//!
//! ```text
//! digital_meetup (2 posters)
//!     001 digital-meetup (2024) 05-01 @ 18:00
//!         Output: build/2024/digital-meetup/digital-meetup-2024-05-01-18:00.png
//! element_meetup (0 posters)
//! ```

use crate::naming::Series;
use crate::render::{PlannedPoster, RenderEvent};
use crate::types::GeneratedAsset;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `path` relative to `root` if it is under it, otherwise as-is.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Build
// ============================================================================

pub fn format_render_event(event: &RenderEvent, root: &Path) -> Vec<String> {
    match event {
        RenderEvent::SeriesStarted {
            series,
            template,
            instance_count,
        } => vec![
            format!("{} ({})", series, plural(*instance_count, "poster")),
            format!("    Template: {}", display_path(template, root)),
        ],
        RenderEvent::PosterStarted { output } => {
            vec![format!("    Producing {}...", display_path(output, root))]
        }
        RenderEvent::PosterProduced { title, .. } => vec![format!("    Produced {}", title)],
    }
}

pub fn format_build_summary(
    assets: &[GeneratedAsset],
    published: usize,
    build_dir: &Path,
    root: &Path,
) -> Vec<String> {
    vec![format!(
        "Generated {}, published {} \u{2192} {}",
        plural(assets.len(), "poster"),
        plural(published, "template file"),
        display_path(build_dir, root)
    )]
}

pub fn print_build_summary(
    assets: &[GeneratedAsset],
    published: usize,
    build_dir: &Path,
    root: &Path,
) {
    for line in format_build_summary(assets, published, build_dir, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Planned posters grouped by series, every series listed even when empty.
pub fn format_check_output(planned: &[PlannedPoster], root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for series in Series::ALL {
        let posters: Vec<&PlannedPoster> = planned.iter().filter(|p| p.series == series).collect();
        lines.push(format!(
            "{} ({})",
            series.key(),
            plural(posters.len(), "poster")
        ));
        for (i, poster) in posters.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(i + 1), poster.title));
            lines.push(format!(
                "        Output: {}",
                display_path(&poster.output, root)
            ));
        }
    }
    lines
}

pub fn print_check_output(planned: &[PlannedPoster], root: &Path) {
    for line in format_check_output(planned, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
