//! Re-flowing a cropped page through an external renderer
//!
//! Shrinking a crop box only changes page metadata: the cropped content is still
//! in the file and the physical page keeps its size. Re-rendering the page with
//! `pdftocairo` produces a new PDF whose page really is the cropped region.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::layout::PaperSize;

/// Name of the poppler renderer binary
pub const PDFTOCAIRO: &str = "pdftocairo";

/// Something that can re-render a PDF onto a given paper size.
///
/// The extractor only depends on this trait, so its geometry can be exercised
/// without an external process.
pub trait PageReflower {
    /// Re-render `input` and return the path of the new PDF.
    ///
    /// Implementations write to [`reflowed_path`] of `input`.
    fn reflow(&self, input: &Path, paper: PaperSize) -> Result<PathBuf>;
}

/// Where a reflower writes its output: `<dir>/<stem>_temp.pdf`
pub fn reflowed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_temp.pdf", stem))
}

/// `pdftocairo` from poppler-utils
#[derive(Debug, Clone)]
pub struct Pdftocairo {
    program: PathBuf,
}

impl Pdftocairo {
    /// Use a specific binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Find `pdftocairo` on the PATH
    pub fn locate() -> Result<Self> {
        let program = which::which(PDFTOCAIRO).map_err(|e| Error::ExternalToolFailed {
            command: PDFTOCAIRO.to_string(),
            reason: format!("not found on PATH ({}); install poppler-utils", e),
        })?;
        debug!(program = %program.display(), "located re-flow tool");
        Ok(Self { program })
    }

    /// Arguments for one re-flow: keep the crop at the page origin, fit it to
    /// `paper` and write a PDF.
    pub fn args(input: &Path, output: &Path, paper: PaperSize) -> Vec<OsString> {
        vec![
            "-nocenter".into(),
            "-paper".into(),
            paper.as_arg().into(),
            "-expand".into(),
            "-pdf".into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ]
    }

    fn command_line(&self, args: &[OsString]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

impl PageReflower for Pdftocairo {
    fn reflow(&self, input: &Path, paper: PaperSize) -> Result<PathBuf> {
        let output = reflowed_path(input);
        let args = Self::args(input, &output, paper);
        let command = self.command_line(&args);

        debug!(%command, "running re-flow tool");
        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| Error::ExternalToolFailed {
                command: command.clone(),
                reason: format!("failed to start: {}", e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::ExternalToolFailed {
                command,
                reason: format!(
                    "exit code {}: {}",
                    result.status.code().map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                    stderr.trim()
                ),
            });
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !stderr.trim().is_empty() {
            warn!(%command, "re-flow tool reported: {}", stderr.trim());
        }

        if !output.exists() {
            return Err(Error::ExternalToolFailed {
                command,
                reason: format!("no output written to {}", output.display()),
            });
        }

        info!("Re-printed {}", output.display());
        Ok(output)
    }
}
