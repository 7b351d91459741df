//! Centralized naming for generated posters.
//!
//! Every poster's location, filename and gallery title is derived from its
//! series prefix and the instance's `year`, `date` and `time`:
//!
//! ```text
//! build/
//! └── 2024/
//!     └── digital-meetup/
//!         └── digital-meetup-2024-05-01-18:00.png
//! ```
//!
//! Title: `digital-meetup (2024) 05-01 @ 18:00`
//!
//! Gallery path (relative to `build/`): `./2024/digital-meetup/digital-meetup-2024-05-01-18:00.png`
//!
//! Instance values are used verbatim. Two instances with the same year, date
//! and time map to the same file and the later one wins.

use crate::config::MeetupInstance;
use std::fmt;
use std::path::{Path, PathBuf};

/// The known meetup series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Digital,
    Element,
    Qeii,
    JumpingBean,
}

impl Series {
    /// Processing order. The gallery shows the reverse of this.
    pub const ALL: [Series; 4] = [
        Series::Digital,
        Series::Element,
        Series::Qeii,
        Series::JumpingBean,
    ];

    /// Prefix used in directory names, filenames and titles.
    pub fn prefix(self) -> &'static str {
        match self {
            Series::Digital => "digital-meetup",
            Series::Element => "element-meetup",
            Series::Qeii => "qeii-meetup",
            Series::JumpingBean => "jumping-bean-meetup",
        }
    }

    /// Table name in `posters.toml`.
    pub fn key(self) -> &'static str {
        match self {
            Series::Digital => "digital_meetup",
            Series::Element => "element_meetup",
            Series::Qeii => "qeii_meetup",
            Series::JumpingBean => "jumping_bean_meetup",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// `<prefix>-<year>-<date>-<time>.png`
pub fn poster_filename(series: Series, instance: &MeetupInstance) -> String {
    format!(
        "{}-{}-{}-{}.png",
        series.prefix(),
        instance.year,
        instance.date,
        instance.time
    )
}

/// `<year>/<prefix>`, relative to the build directory.
pub fn poster_dir(series: Series, instance: &MeetupInstance) -> PathBuf {
    Path::new(&instance.year).join(series.prefix())
}

/// `<build_dir>/<year>/<prefix>/<prefix>-<year>-<date>-<time>.png`
pub fn poster_output_path(
    build_dir: &Path,
    series: Series,
    instance: &MeetupInstance,
) -> PathBuf {
    build_dir
        .join(poster_dir(series, instance))
        .join(poster_filename(series, instance))
}

/// Human-readable title: `<prefix> (<year>) <date> @ <time>`.
pub fn poster_title(series: Series, instance: &MeetupInstance) -> String {
    format!(
        "{} ({}) {} @ {}",
        series.prefix(),
        instance.year,
        instance.date,
        instance.time
    )
}

/// Path used by the gallery page, relative to the build directory and
/// always `/`-separated: `./<year>/<prefix>/<filename>`.
pub fn gallery_path(series: Series, instance: &MeetupInstance) -> String {
    format!(
        "./{}/{}/{}",
        instance.year,
        series.prefix(),
        poster_filename(series, instance)
    )
}
