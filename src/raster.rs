//! SVG → PNG rasterization through an external tool.
//!
//! The [`Rasterizer`] trait is the seam between the pipeline and whatever
//! turns a rendered SVG into a PNG. Two command-line tools are supported:
//!
//! | Kind | Invocation |
//! |---|---|
//! | [`RsvgConvert`] (default) | `rsvg-convert <input> -o <output>` |
//! | [`Inkscape`] | `inkscape --export-type=png --export-filename=<output> <input>` |
//!
//! Both block until the child exits. A missing binary or a non-zero exit
//! status is reported as a [`RasterError`] and stops the run.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed ({status}) rasterizing {}: {stderr}", .input.display())]
    Failed {
        program: String,
        input: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Converts a vector document at `input` into a PNG at `output`.
///
/// Implementations create or overwrite `output` and must not return until
/// the file is fully written.
pub trait Rasterizer {
    fn rasterize(&self, input: &Path, output: &Path) -> Result<(), RasterError>;

    /// Short name for progress output.
    fn name(&self) -> &str;
}

/// Which external tool to use. Selected with `--rasterizer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RasterizerKind {
    /// librsvg's `rsvg-convert`
    #[default]
    Rsvg,
    /// Inkscape 1.x command line
    Inkscape,
}

impl RasterizerKind {
    /// Build the rasterizer, optionally overriding the program to run.
    pub fn build(self, program: Option<PathBuf>) -> Box<dyn Rasterizer> {
        match (self, program) {
            (RasterizerKind::Rsvg, None) => Box::new(RsvgConvert::new()),
            (RasterizerKind::Rsvg, Some(p)) => Box::new(RsvgConvert::with_program(p)),
            (RasterizerKind::Inkscape, None) => Box::new(Inkscape::new()),
            (RasterizerKind::Inkscape, Some(p)) => Box::new(Inkscape::with_program(p)),
        }
    }
}

/// `rsvg-convert <input> -o <output>`
#[derive(Debug, Clone)]
pub struct RsvgConvert {
    program: PathBuf,
}

impl RsvgConvert {
    pub fn new() -> Self {
        Self::with_program("rsvg-convert")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(input).arg("-o").arg(output);
        cmd
    }
}

impl Default for RsvgConvert {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for RsvgConvert {
    fn rasterize(&self, input: &Path, output: &Path) -> Result<(), RasterError> {
        run(self.command(input, output), &self.program, input)
    }

    fn name(&self) -> &str {
        "rsvg-convert"
    }
}

/// `inkscape --export-type=png --export-filename=<output> <input>`
#[derive(Debug, Clone)]
pub struct Inkscape {
    program: PathBuf,
}

impl Inkscape {
    pub fn new() -> Self {
        Self::with_program("inkscape")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut export_filename = std::ffi::OsString::from("--export-filename=");
        export_filename.push(output);
        let mut cmd = Command::new(&self.program);
        cmd.arg("--export-type=png").arg(export_filename).arg(input);
        cmd
    }
}

impl Default for Inkscape {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for Inkscape {
    fn rasterize(&self, input: &Path, output: &Path) -> Result<(), RasterError> {
        run(self.command(input, output), &self.program, input)
    }

    fn name(&self) -> &str {
        "inkscape"
    }
}

/// Run a rasterizer command to completion and check its exit status.
fn run(mut cmd: Command, program: &Path, input: &Path) -> Result<(), RasterError> {
    debug!(command = ?cmd, "rasterizing");
    let program_name = program.display().to_string();
    let out = cmd.output().map_err(|source| RasterError::Spawn {
        program: program_name.clone(),
        source,
    })?;
    if !out.status.success() {
        return Err(RasterError::Failed {
            program: program_name,
            input: input.to_path_buf(),
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(())
}
