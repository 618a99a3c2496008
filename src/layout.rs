//! Header band and paper size calculations

use std::fmt;
use std::str::FromStr;

/// Padding added to the header band when none is given explicitly
pub const DEFAULT_PADDING: f32 = 5.0;

/// Height of the header band, in points, for a resume with `pages` pages.
///
/// One-page resumes get a 150pt band, two-or-more-page resumes get 180pt.
/// Extraction calls this with zero padding; the merger uses [`DEFAULT_PADDING`].
pub fn header_size(pages: u32, padding: f32) -> f32 {
    let extra = pages.saturating_sub(1).min(1) as f32;
    150.0 + 30.0 * extra + padding
}

/// Paper sizes understood by the re-flow tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperSize {
    /// A4 (210mm × 297mm)
    #[default]
    A4,
    /// US Letter (8.5" × 11")
    Letter,
}

impl PaperSize {
    /// Value passed to `pdftocairo -paper`
    pub fn as_arg(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::Letter => "letter",
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("a4") {
            Ok(PaperSize::A4)
        } else if s.eq_ignore_ascii_case("letter") {
            Ok(PaperSize::Letter)
        } else {
            Err(format!("unknown paper size '{}' (expected A4 or letter)", s))
        }
    }
}
