//! # Socials
//!
//! Generates meetup posters. A single `posters.toml` lists four recurring
//! meetup series, each with an SVG template and a list of dated instances.
//! Every instance becomes a PNG poster, and all posters are collected on one
//! gallery page.
//!
//! # Pipeline
//!
//! ```text
//! posters.toml ──▶ config ──▶ render ──▶ (template → raster) per instance
//!                                │
//!                                ▼
//!                     gallery (index.html, posters.json)
//!                     publish (templates/ → build/templates/)
//! ```
//!
//! One forward pass, strictly sequential. Output files are overwritten on
//! every run; nothing else persists between runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `posters.toml` schema and loading; project layout |
//! | [`naming`] | The four series; output paths, filenames and titles |
//! | [`template`] | Mustache-style `{{field}}` rendering |
//! | [`raster`] | [`Rasterizer`](raster::Rasterizer) trait and the `rsvg-convert` / Inkscape adapters |
//! | [`render`] | Drives template + rasterizer for every instance |
//! | [`gallery`] | Gallery HTML (Maud) and the JSON manifest |
//! | [`publish`] | Copies the templates directory into the build tree |
//! | [`types`] | [`GeneratedAsset`](types::GeneratedAsset) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Closed Config Schema
//!
//! [`PosterCollection`](config::PosterCollection) is a record with exactly
//! four fields rather than a map of series. A misspelt table name leaves a
//! required series missing, which is a parse error instead of a silently
//! empty series. Extra keys are ignored. Adding a series means adding a field
//! and a [`Series`](naming::Series) variant.
//!
//! ## Rasterizer as a Trait
//!
//! The external SVG → PNG tool sits behind [`raster::Rasterizer`]. The
//! pipeline does not know which tool runs, and tests substitute a recording
//! fake. The child's exit status is checked: a missing tool or a failed
//! conversion stops the run with an error rather than leaving a gap in the
//! gallery.
//!
//! ## Explicit Project Root
//!
//! Every path is derived from a [`ProjectLayout`](config::ProjectLayout)
//! instead of the process working directory, so the whole pipeline runs
//! against a temp directory in tests.

pub mod config;
pub mod gallery;
pub mod naming;
pub mod output;
pub mod publish;
pub mod raster;
pub mod render;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
