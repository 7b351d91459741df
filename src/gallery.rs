//! Gallery page and manifest generation.
//!
//! Writes the two aggregate outputs of a build:
//!
//! ```text
//! build/
//! ├── index.html     # One titled image block per poster, newest first
//! └── posters.json   # The full posters config, 2-space indented
//! ```
//!
//! HTML is produced with [maud](https://maud.lambda.xyz/), so titles and
//! paths are escaped on interpolation.

use crate::config::PosterCollection;
use crate::types::GeneratedAsset;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const INDEX_FILENAME: &str = "index.html";
pub const MANIFEST_FILENAME: &str = "posters.json";

const SITE_TITLE: &str = "CTSNL Socials";
const TAGLINE: &str = "Automagically generating social assets";
const REPOSITORY_URL: &str = "https://github.com/CTS-NL/Socials";

const CSS: &str = "
body {
    font-family: sans-serif;
    margin: 4rem;
}
.output {
    margin: 2rem 0;
}
.output img {
    max-width: 40rem;
}
";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render the gallery page. Assets appear in the order given.
pub fn render_gallery(assets: &[GeneratedAsset]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (SITE_TITLE) }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1 { (SITE_TITLE) }
                p { (TAGLINE) }
                a href=(REPOSITORY_URL) { (REPOSITORY_URL) }
                @for asset in assets {
                    (render_asset(asset))
                }
            }
        }
    }
}

fn render_asset(asset: &GeneratedAsset) -> Markup {
    html! {
        div.output {
            h2 { (asset.title) }
            img src=(asset.path) alt=(asset.title);
        }
    }
}

/// Serialize the full config as 2-space indented JSON.
pub fn manifest_json(posters: &PosterCollection) -> Result<String, GalleryError> {
    Ok(serde_json::to_string_pretty(posters)?)
}

/// Write `index.html` and `posters.json` into `build_dir`.
pub fn write_gallery(
    build_dir: &Path,
    assets: &[GeneratedAsset],
    posters: &PosterCollection,
) -> Result<(), GalleryError> {
    fs::create_dir_all(build_dir)?;
    fs::write(
        build_dir.join(INDEX_FILENAME),
        render_gallery(assets).into_string(),
    )?;
    fs::write(build_dir.join(MANIFEST_FILENAME), manifest_json(posters)?)?;
    Ok(())
}
