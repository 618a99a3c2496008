//! PDF metadata and page geometry inspection

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::Result;
use crate::pdf::geometry::{PageGeometry, Rect};
use crate::pdf::page::{load_document, page_id};

/// What `info` reports about a PDF
#[derive(Debug, Clone)]
pub struct PdfInfo {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Media box of page 1
    pub media_box: Rect,
    /// Crop box of page 1 (the media box when none is set)
    pub crop_box: Rect,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Page count, first-page boxes and Info strings of a PDF file
pub fn inspect(path: &Path) -> Result<PdfInfo> {
    let doc = load_document(path)?;
    let first = page_id(&doc, path, 1)?;
    let geometry = PageGeometry::read(&doc, first)?;

    Ok(PdfInfo {
        page_count: doc.get_pages().len(),
        media_box: geometry.media_box,
        crop_box: geometry.crop_box,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
    })
}

/// Read a string entry from the trailer's Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let bytes = info.as_dict().ok()?.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_inspect_nonexistent_file() {
        let result = inspect(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::MissingFile(_)));
    }

    #[test]
    fn test_info_string_from_inline_dictionary() {
        let mut doc = Document::with_version("1.5");
        let mut info = lopdf::Dictionary::new();
        info.set("Title", Object::string_literal("Resume"));
        doc.trailer.set("Info", Object::Dictionary(info));

        assert_eq!(info_string(&doc, b"Title").as_deref(), Some("Resume"));
        assert_eq!(info_string(&doc, b"Author"), None);
    }
}
