//! Poster configuration module.
//!
//! Handles loading and parsing `posters.toml`, and resolving the project
//! layout (where the config, templates and build output live).
//!
//! ## Config File Location
//!
//! `posters.toml` sits in the project root, next to the templates directory:
//!
//! ```text
//! project/
//! ├── posters.toml             # Series and instances
//! ├── templates/
//! │   ├── digital-meetup.svg
//! │   └── ...
//! └── build/                   # Generated output (overwritten on every run)
//! ```
//!
//! ## Configuration Format
//!
//! The schema is closed: exactly four series tables, each with a template
//! and a list of dated instances.
//!
//! ```toml
//! [digital_meetup.meta]
//! template = "templates/digital-meetup.svg"
//!
//! [[digital_meetup.instances]]
//! year = "2024"
//! date = "05-01"
//! time = "18:00"
//!
//! [element_meetup]
//! meta = { template = "templates/element-meetup.svg" }
//! instances = []
//!
//! [qeii_meetup]
//! meta = { template = "templates/qeii-meetup.svg" }
//! instances = []
//!
//! [jumping_bean_meetup]
//! meta = { template = "templates/jumping-bean-meetup.svg" }
//! instances = []
//! ```
//!
//! All four tables are required, even with no instances. Instance fields are
//! strings (`year = 2024` is a type error). Keys outside the schema are
//! ignored, so a table may carry notes for humans (`venue`, `author`, ...).

use crate::naming::Series;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config filename, relative to the project root.
pub const CONFIG_FILENAME: &str = "posters.toml";
/// Default templates directory, relative to the project root.
pub const TEMPLATES_DIR: &str = "templates";
/// Default build directory, relative to the project root.
pub const BUILD_DIR: &str = "build";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid posters config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The full set of poster series, as declared in `posters.toml`.
///
/// One field per known meetup type. Adding a series means adding a field
/// here and a variant to [`Series`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterCollection {
    pub digital_meetup: MeetupSeries,
    pub element_meetup: MeetupSeries,
    pub qeii_meetup: MeetupSeries,
    pub jumping_bean_meetup: MeetupSeries,
}

impl PosterCollection {
    /// Look up the series for a given kind.
    pub fn get(&self, series: Series) -> &MeetupSeries {
        match series {
            Series::Digital => &self.digital_meetup,
            Series::Element => &self.element_meetup,
            Series::Qeii => &self.qeii_meetup,
            Series::JumpingBean => &self.jumping_bean_meetup,
        }
    }

    /// All series in processing order: digital, element, qeii, jumping-bean.
    pub fn series(&self) -> impl Iterator<Item = (Series, &MeetupSeries)> {
        Series::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Total number of instances across every series.
    pub fn instance_count(&self) -> usize {
        self.series().map(|(_, m)| m.instances.len()).sum()
    }
}

/// One recurring event type with its own poster template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupSeries {
    pub meta: SeriesMeta,
    pub instances: Vec<MeetupInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    /// Template path, relative to the project root unless absolute.
    pub template: String,
}

/// One concrete occurrence of a meetup. These are also the fields available
/// to the poster template (`{{year}}`, `{{date}}`, `{{time}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupInstance {
    pub year: String,
    pub date: String,
    pub time: String,
}

/// Parse a posters config from TOML text.
pub fn parse_config(content: &str) -> Result<PosterCollection, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and parse a posters config file.
///
/// Returns [`ConfigError::NotFound`] when the file does not exist, and
/// [`ConfigError::Toml`] when it does not match the schema.
pub fn load_config(path: &Path) -> Result<PosterCollection, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    parse_config(&content)
}

/// Where a project's inputs and outputs live.
///
/// Every path the pipeline touches is derived from here rather than from the
/// process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub templates_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl ProjectLayout {
    /// Default layout under `root`: `posters.toml`, `templates/`, `build/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join(CONFIG_FILENAME),
            templates_dir: root.join(TEMPLATES_DIR),
            build_dir: root.join(BUILD_DIR),
            root,
        }
    }

    /// Resolve a path from the config (e.g. a template) against the root.
    /// Absolute paths are returned as-is.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Where the copy of the templates directory goes in the build tree.
    pub fn published_templates_dir(&self) -> PathBuf {
        self.build_dir.join(TEMPLATES_DIR)
    }
}
