//! Shared test utilities.
//!
//! Provides a fixture project on disk and a recording rasterizer so pipeline
//! tests run without `rsvg-convert` or Inkscape installed.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let layout = ProjectLayout::new(tmp.path());
//! let raster = FakeRasterizer::new();
//! let assets = render_posters(&layout, &posters, &raster, None).unwrap();
//! assert_eq!(raster.calls().len(), assets.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use crate::config::{MeetupInstance, MeetupSeries, PosterCollection, SeriesMeta};
use crate::publish::publish_templates;
use crate::raster::{RasterError, Rasterizer};

/// Bytes written by [`FakeRasterizer`] in place of a real PNG.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    publish_templates(&fixtures, tmp.path()).unwrap();
    tmp
}

// =========================================================================
// Config builders
// =========================================================================

pub fn instance(year: &str, date: &str, time: &str) -> MeetupInstance {
    MeetupInstance {
        year: year.into(),
        date: date.into(),
        time: time.into(),
    }
}

pub fn series(template: &str, instances: Vec<MeetupInstance>) -> MeetupSeries {
    MeetupSeries {
        meta: SeriesMeta {
            template: template.into(),
        },
        instances,
    }
}

/// A collection where every series uses `template` and has no instances.
pub fn empty_collection(template: &str) -> PosterCollection {
    PosterCollection {
        digital_meetup: series(template, vec![]),
        element_meetup: series(template, vec![]),
        qeii_meetup: series(template, vec![]),
        jumping_bean_meetup: series(template, vec![]),
    }
}

// =========================================================================
// Recording rasterizer
// =========================================================================

/// A recorded rasterize call, with the SVG content as it was at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub svg: String,
}

/// Records every call and writes [`FAKE_PNG`] to the output path.
/// Calls whose output path contains `fail_on` return an error instead.
#[derive(Default)]
pub struct FakeRasterizer {
    calls: Mutex<Vec<RasterCall>>,
    fail_on: Option<String>,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(pattern.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<RasterCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(&self, input: &Path, output: &Path) -> Result<(), RasterError> {
        let svg = fs::read_to_string(input).unwrap();
        self.calls.lock().unwrap().push(RasterCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            svg,
        });
        if let Some(pattern) = &self.fail_on
            && output.to_string_lossy().contains(pattern.as_str())
        {
            return Err(RasterError::Spawn {
                program: "fake".to_string(),
                source: std::io::Error::other("refusing to rasterize"),
            });
        }
        fs::write(output, FAKE_PNG).unwrap();
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}
