//! Publishing the templates directory into the build tree.
//!
//! `templates/` is copied to `build/templates/` so the published gallery links
//! to the sources its posters came from. The copy merges: existing files at
//! the destination are overwritten, files that only exist at the destination
//! are left alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("templates directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("walking {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Recursively copy `src` into `dst`, overwriting files that already exist.
///
/// Returns the number of files copied.
pub fn publish_templates(src: &Path, dst: &Path) -> Result<usize, PublishError> {
    if !src.is_dir() {
        return Err(PublishError::SourceNotFound(src.to_path_buf()));
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|source| PublishError::Walk {
            root: src.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            debug!(from = %entry.path().display(), to = %target.display(), "publishing");
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
