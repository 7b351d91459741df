//! Poster rendering pipeline.
//!
//! Walks every series in fixed order (digital, element, qeii, jumping-bean)
//! and every instance in declaration order. For each instance:
//!
//! 1. render the series template with the instance's fields
//! 2. write the SVG to a scoped temp file
//! 3. create `build/<year>/<prefix>/`
//! 4. rasterize to `build/<year>/<prefix>/<prefix>-<year>-<date>-<time>.png`
//! 5. record a [`GeneratedAsset`]
//!
//! The temp file is removed at the end of each iteration, whether or not
//! rasterization succeeded. The finished asset list is reversed so the most
//! recently declared poster comes first in the gallery.
//!
//! Work is strictly sequential. Any error stops the run; posters already
//! written stay on disk.

use crate::config::{MeetupInstance, PosterCollection, ProjectLayout};
use crate::naming::{self, Series};
use crate::raster::{RasterError, Rasterizer};
use crate::template::{self, TemplateError};
use crate::types::GeneratedAsset;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("template error in {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),
}

/// Progress events emitted while rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    SeriesStarted {
        series: Series,
        template: PathBuf,
        instance_count: usize,
    },
    PosterStarted {
        output: PathBuf,
    },
    PosterProduced {
        title: String,
        output: PathBuf,
    },
}

/// A poster the pipeline would produce, without producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPoster {
    pub series: Series,
    pub title: String,
    pub output: PathBuf,
}

/// Render and rasterize every poster in `posters`.
///
/// Returns the produced assets, most recently declared first.
pub fn render_posters(
    layout: &ProjectLayout,
    posters: &PosterCollection,
    rasterizer: &dyn Rasterizer,
    events: Option<Sender<RenderEvent>>,
) -> Result<Vec<GeneratedAsset>, RenderError> {
    let emit = |event: RenderEvent| {
        if let Some(tx) = &events {
            // A closed receiver only means nobody is printing progress.
            tx.send(event).ok();
        }
    };

    let mut assets = Vec::with_capacity(posters.instance_count());

    for (series, meetup) in posters.series() {
        let template_path = layout.resolve(&meetup.meta.template);
        let template = read_template(&template_path)?;
        info!(series = %series, instances = meetup.instances.len(), "rendering series");
        emit(RenderEvent::SeriesStarted {
            series,
            template: template_path.clone(),
            instance_count: meetup.instances.len(),
        });

        for instance in &meetup.instances {
            let svg = render_svg(&template, &template_path, instance)?;

            let mut scratch = tempfile::Builder::new()
                .prefix("socials-")
                .suffix(".svg")
                .tempfile()?;
            scratch.write_all(svg.as_bytes())?;
            scratch.flush()?;
            debug!(path = %scratch.path().display(), "wrote rendered svg");

            let parent = layout.build_dir.join(naming::poster_dir(series, instance));
            fs::create_dir_all(&parent)?;
            let output = parent.join(naming::poster_filename(series, instance));

            emit(RenderEvent::PosterStarted {
                output: output.clone(),
            });
            rasterizer.rasterize(scratch.path(), &output)?;

            let title = naming::poster_title(series, instance);
            emit(RenderEvent::PosterProduced {
                title: title.clone(),
                output,
            });
            assets.push(GeneratedAsset {
                title,
                path: naming::gallery_path(series, instance),
            });
        }
    }

    assets.reverse();
    Ok(assets)
}

/// Confirm every template exists and renders for every instance, without
/// writing anything. Returns the posters a build would produce, in
/// processing order.
pub fn plan_posters(
    layout: &ProjectLayout,
    posters: &PosterCollection,
) -> Result<Vec<PlannedPoster>, RenderError> {
    let mut planned = Vec::with_capacity(posters.instance_count());
    for (series, meetup) in posters.series() {
        let template_path = layout.resolve(&meetup.meta.template);
        let template = read_template(&template_path)?;
        for instance in &meetup.instances {
            render_svg(&template, &template_path, instance)?;
            planned.push(PlannedPoster {
                series,
                title: naming::poster_title(series, instance),
                output: naming::poster_output_path(&layout.build_dir, series, instance),
            });
        }
    }
    Ok(planned)
}

fn read_template(path: &Path) -> Result<String, RenderError> {
    match fs::read_to_string(path) {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(RenderError::TemplateNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

fn render_svg(
    template: &str,
    template_path: &Path,
    instance: &MeetupInstance,
) -> Result<String, RenderError> {
    template::render(template, instance).map_err(|source| RenderError::Template {
        path: template_path.to_path_buf(),
        source,
    })
}
