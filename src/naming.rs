//! Output file naming
//!
//! Pipelines work with a *base name*: the output path without its `.pdf` extension.

use std::path::{Path, PathBuf};
use crate::error::{Error, Result};

/// Default prefix for extracted headers
pub const HEADER_PREFIX: &str = "header";

/// Default prefix for composited resumes
pub const OUTPUT_PREFIX: &str = "output";

/// Work out the output base name for a command.
///
/// With an explicit `--output-file`, a trailing `.pdf` is stripped
/// (case-insensitively). Otherwise the name is `<prefix>_<pages>_<resume stem>`.
///
/// # Example
///
/// ```
/// use resume_editor::naming::output_base;
/// use std::path::Path;
///
/// let base = output_base(None, "header", 1, Path::new("resume.pdf")).unwrap();
/// assert_eq!(base, "header_1_resume");
///
/// let base = output_base(Some("out.PDF"), "header", 1, Path::new("resume.pdf")).unwrap();
/// assert_eq!(base, "out");
/// ```
pub fn output_base(
    explicit: Option<&str>,
    prefix: &str,
    pages: u32,
    resume: &Path,
) -> Result<String> {
    match explicit {
        Some(name) => explicit_base(name),
        None => {
            let stem = resume
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::MalformedOutputPath(resume.display().to_string()))?;
            Ok(format!("{}_{}_{}", prefix, pages, stem))
        }
    }
}

fn explicit_base(name: &str) -> Result<String> {
    let malformed = || Error::MalformedOutputPath(name.to_string());

    if name.trim().is_empty() || name.ends_with('/') || name.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(malformed());
    }

    let base = match name.len().checked_sub(4) {
        Some(split) if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".pdf") => {
            &name[..split]
        }
        _ => name,
    };

    // Reject values that were only an extension, or a directory plus extension
    if base.is_empty() || base.ends_with('/') || base.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(malformed());
    }

    Ok(base.to_string())
}

/// Final PDF path for a base name
pub fn pdf_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{}.pdf", base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_name() {
        let base = output_base(None, HEADER_PREFIX, 1, Path::new("resume.pdf")).unwrap();
        assert_eq!(base, "header_1_resume");
    }

    #[test]
    fn test_default_output_name() {
        let base = output_base(None, OUTPUT_PREFIX, 2, Path::new("resume.pdf")).unwrap();
        assert_eq!(base, "output_2_resume");
    }

    #[test]
    fn test_default_name_drops_directories() {
        let base = output_base(None, OUTPUT_PREFIX, 1, Path::new("drafts/2024/resume.pdf")).unwrap();
        assert_eq!(base, "output_1_resume");
    }

    #[test]
    fn test_explicit_extension_stripped_case_insensitively() {
        for name in ["out.pdf", "out.PDF", "out.Pdf"] {
            assert_eq!(output_base(Some(name), HEADER_PREFIX, 1, Path::new("r.pdf")).unwrap(), "out");
        }
    }

    #[test]
    fn test_explicit_without_extension_kept() {
        assert_eq!(output_base(Some("final"), OUTPUT_PREFIX, 1, Path::new("r.pdf")).unwrap(), "final");
        assert_eq!(output_base(Some("dir/final"), OUTPUT_PREFIX, 1, Path::new("r.pdf")).unwrap(), "dir/final");
    }

    #[test]
    fn test_malformed_explicit_names() {
        for name in ["", "  ", ".pdf", "dir/", "dir/.PDF"] {
            let result = output_base(Some(name), OUTPUT_PREFIX, 1, Path::new("r.pdf"));
            assert!(
                matches!(result, Err(Error::MalformedOutputPath(_))),
                "expected {:?} to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_resume_without_stem() {
        let result = output_base(None, OUTPUT_PREFIX, 1, Path::new("/"));
        assert!(matches!(result, Err(Error::MalformedOutputPath(_))));
    }

    #[test]
    fn test_pdf_path_from_base() {
        assert_eq!(pdf_path("header_1_resume"), PathBuf::from("header_1_resume.pdf"));
    }
}
