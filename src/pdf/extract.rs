//! Header extraction
//!
//! Crops the header band off page 1 of an existing resume, re-flows the crop
//! through a [`PageReflower`] so the page physically shrinks to it, then fixes
//! up the re-flowed page's boxes.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::layout::{header_size, PaperSize};
use crate::naming::pdf_path;
use crate::pdf::geometry::{EffectiveBox, PageGeometry, Rect};
use crate::pdf::page::{isolate_first_page, load_document, save_document};
use crate::reflow::{reflowed_path, PageReflower};

/// Extra room kept above the header band on the final page
const TOP_MARGIN: f32 = 30.0;

/// Options for extracting a header
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Resume that already contains the header
    pub source: PathBuf,
    /// Number of pages in the resume the header belongs to (1 or 2)
    pub page_count: u32,
    /// Output path without the `.pdf` extension
    pub output_base: String,
    /// Paper size handed to the re-flow tool
    pub paper: PaperSize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            page_count: 1,
            output_base: "header".to_string(),
            paper: PaperSize::A4,
        }
    }
}

/// Removes a file when dropped
struct TempFileGuard(PathBuf);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.0.exists() {
            return;
        }
        match fs::remove_file(&self.0) {
            Ok(()) => info!("Cleaned {}", self.0.display()),
            Err(e) => warn!("Could not remove {}: {}", self.0.display(), e),
        }
    }
}

/// Crop the header band: crop box starts `header_size(pages, 0)` below the top
/// of the media box, and the media box's lower-right corner is pinned to
/// `(width, 0)`. Only those two corners change.
pub fn crop_header_band(geometry: &mut PageGeometry, page_count: u32) {
    let (width, height) = geometry.media_box.upper_right();
    let crop_start = height - header_size(page_count, 0.0);

    geometry.crop_box.set_lower_left((0.0, crop_start));
    geometry.media_box.set_lower_right((width, 0.0));
}

/// Bounds of the re-flowed header page.
///
/// `original_height` is the height of the source resume page. The re-flow tool
/// leaves the crop near the bottom of a full page, so the box is stretched from
/// `band - original_height` up to `band + 30`.
pub fn reflowed_header_box(reflowed_media: Rect, page_count: u32, original_height: f32) -> EffectiveBox {
    let band = header_size(page_count, 0.0);
    let mut media = reflowed_media;

    media.set_upper_left((0.0, band + TOP_MARGIN));
    let (current_urx, _) = media.lower_right();
    media.set_lower_right((current_urx, band - original_height));

    EffectiveBox::new(media)
}

/// Extract a standalone header PDF from a resume.
///
/// Writes `{output_base}.pdf` and returns its path. The re-flow tool's
/// temporary output is removed on every exit path.
///
/// # Example
///
/// ```no_run
/// use resume_editor::pdf::{extract_header, ExtractOptions};
/// use resume_editor::reflow::Pdftocairo;
/// use std::path::PathBuf;
///
/// let options = ExtractOptions {
///     source: PathBuf::from("resume.pdf"),
///     page_count: 1,
///     output_base: "header_1_resume".to_string(),
///     ..Default::default()
/// };
///
/// let reflower = Pdftocairo::locate().expect("pdftocairo not installed");
/// let header = extract_header(&options, &reflower).expect("Failed to extract header");
/// ```
pub fn extract_header(options: &ExtractOptions, reflower: &dyn PageReflower) -> Result<PathBuf> {
    let output_path = pdf_path(&options.output_base);

    // Step 1: crop the header band of page 1
    let mut doc = load_document(&options.source)?;
    let page = isolate_first_page(&mut doc, &options.source)?;

    let mut geometry = PageGeometry::read(&doc, page)?;
    let (_, original_height) = geometry.media_box.upper_right();
    crop_header_band(&mut geometry, options.page_count);
    debug!(?geometry, "cropped header band");

    geometry.write(&mut doc, page)?;
    save_document(&mut doc, &output_path)?;
    info!("Printed {}", output_path.display());

    // Step 2: re-flow the crop onto a full page
    let _temp = TempFileGuard(reflowed_path(&output_path));
    let reflowed = reflower.reflow(&output_path, options.paper)?;

    // Step 3: fix up the re-flowed page and overwrite the output
    finalize_reflowed(&reflowed, &output_path, options.page_count, original_height)?;
    info!("Re-printed {}", output_path.display());

    Ok(output_path)
}

fn finalize_reflowed(
    reflowed: &Path,
    output_path: &Path,
    page_count: u32,
    original_height: f32,
) -> Result<()> {
    let mut doc = load_document(reflowed)?;
    let page = isolate_first_page(&mut doc, reflowed)?;

    let geometry = PageGeometry::read(&doc, page)?;
    let header_box = reflowed_header_box(geometry.media_box, page_count, original_height);
    debug!(header_box = ?header_box.rect(), "collapsed page boxes");

    header_box.write(&mut doc, page)?;
    save_document(&mut doc, output_path)
}
