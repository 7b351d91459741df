//! Shared types passed between the render and gallery stages.

use serde::Serialize;

/// A poster that was produced during this run.
///
/// Display record only: it feeds the gallery page and the CLI summary and is
/// not written out on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedAsset {
    /// `<prefix> (<year>) <date> @ <time>`
    pub title: String,
    /// Image path relative to the build directory, e.g.
    /// `./2024/digital-meetup/digital-meetup-2024-05-01-18:00.png`
    pub path: String,
}
