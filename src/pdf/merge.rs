//! Compositing a header onto a resume template using lopdf

use std::path::PathBuf;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use crate::error::Result;
use crate::layout::{header_size, DEFAULT_PADDING};
use crate::naming::pdf_path;
use crate::pdf::geometry::{PageGeometry, Rect};
use crate::pdf::page::{
    inherited_attribute, load_document, materialize_inherited, page_content_and_resources,
    page_id, rebuild_page_tree, save_document,
};

/// Scale applied to the header before compositing
pub const DEFAULT_HEADER_SCALE: f32 = 0.78;

/// How far the merged page's lower edge is pushed down after expansion
pub const DEFAULT_VERTICAL_OFFSET: f32 = 400.0;

/// XObject names used on the composited page
const HEADER_XOBJECT: &str = "ResumeHeader";
const BODY_XOBJECT: &str = "ResumeBody";

/// Options for merging a header onto a template
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Single-page header PDF (usually produced by `extract_header`)
    pub header_path: PathBuf,
    /// Resume body without a header
    pub template_path: PathBuf,
    /// Number of template pages to emit (1 or 2)
    pub page_count: u32,
    /// Output path without the `.pdf` extension
    pub output_base: String,
    /// Uniform scale applied to the header about its origin
    pub header_scale: f32,
    /// Amount subtracted from the merged media box's lower-left y
    pub vertical_offset: f32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            header_path: PathBuf::new(),
            template_path: PathBuf::new(),
            page_count: 1,
            output_base: "output".to_string(),
            header_scale: DEFAULT_HEADER_SCALE,
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
        }
    }
}

/// Media box of the composited page: the union of the template page and the
/// scaled header, with the lower-left corner then lowered by `vertical_offset`.
pub fn merged_media_box(template: Rect, header: Rect, header_scale: f32, vertical_offset: f32) -> Rect {
    let mut merged = template.union(&header.scaled(header_scale));
    let (llx, lly) = merged.lower_left();
    merged.set_lower_left((llx, lly - vertical_offset));
    merged
}

/// Composite a header onto the first page of a template.
///
/// The template page is drawn first and the scaled header on top of it. Each is
/// embedded as its own Form XObject, so their resources never clash. With
/// `page_count == 2` the template's second page follows unchanged.
///
/// # Example
///
/// ```no_run
/// use resume_editor::pdf::{merge_header, MergeOptions};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     header_path: PathBuf::from("header_1_resume.pdf"),
///     template_path: PathBuf::from("resume.pdf"),
///     page_count: 1,
///     output_base: "output_1_resume".to_string(),
///     ..Default::default()
/// };
///
/// merge_header(&options).expect("Failed to merge");
/// ```
pub fn merge_header(options: &MergeOptions) -> Result<PathBuf> {
    let output_path = pdf_path(&options.output_base);

    let mut template = load_document(&options.template_path)?;
    let mut header = load_document(&options.header_path)?;

    // Put both documents in one ID space: header objects first, then template
    header.renumber_objects_with(1);
    template.renumber_objects_with(header.max_id + 1);
    let max_id = template.max_id;

    let template_first = page_id(&template, &options.template_path, 1)?;
    let template_second = if options.page_count == 2 {
        Some(page_id(&template, &options.template_path, 2)?)
    } else {
        None
    };
    let header_page = page_id(&header, &options.header_path, 1)?;

    let template_box = PageGeometry::read(&template, template_first)?.media_box;
    let header_box = PageGeometry::read(&header, header_page)?.media_box;

    let band = header_size(options.page_count, DEFAULT_PADDING);
    debug!(
        band,
        translate_y = band - template_box.height(),
        ?template_box,
        ?header_box,
        "compositing header"
    );

    let (template_content, template_resources) = page_content_and_resources(&template, template_first)?;
    let (header_content, header_resources) = page_content_and_resources(&header, header_page)?;

    if let Some(second) = template_second {
        materialize_inherited(&mut template, second)?;
    }

    let doc_info = template.trailer.get(b"Info").ok().cloned();

    let mut merged_doc = Document::with_version("1.5");
    merged_doc.objects.extend(header.objects);
    merged_doc.objects.extend(template.objects);
    // New IDs must not collide with anything just imported
    merged_doc.max_id = max_id;

    let body_form = create_form_xobject(
        &mut merged_doc,
        template_content,
        template_box,
        template_resources,
        1.0,
    );
    let header_form = create_form_xobject(
        &mut merged_doc,
        header_content,
        header_box,
        header_resources,
        options.header_scale,
    );

    let media_box = merged_media_box(
        template_box,
        header_box,
        options.header_scale,
        options.vertical_offset,
    );
    let merged_page = create_composited_page(&mut merged_doc, body_form, header_form);
    PageGeometry { media_box, crop_box: media_box }.write(&mut merged_doc, merged_page)?;
    carry_page_attributes(&mut merged_doc, template_first, merged_page)?;

    let mut page_ids = vec![merged_page];
    page_ids.extend(template_second);

    // Set before pruning so an indirect Info dictionary stays reachable
    if let Some(doc_info) = doc_info {
        merged_doc.trailer.set("Info", doc_info);
    }
    rebuild_page_tree(&mut merged_doc, &page_ids)?;

    save_document(&mut merged_doc, &output_path)?;
    info!("Merged {} onto {} -> {}",
        options.header_path.display(),
        options.template_path.display(),
        output_path.display()
    );

    Ok(output_path)
}

/// Wrap a page's content in a Form XObject scaled uniformly by `scale`
fn create_form_xobject(
    doc: &mut Document,
    content: Vec<u8>,
    bbox: Rect,
    resources: Object,
    scale: f32,
) -> ObjectId {
    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));

    // BBox is in form space, i.e. the page's own unscaled coordinates
    xobject_dict.set("BBox", bbox.to_object());
    xobject_dict.set("Matrix", Object::Array(vec![
        Object::Real(scale),
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(scale),
        Object::Integer(0),
        Object::Integer(0),
    ]));
    xobject_dict.set("Resources", resources);

    doc.add_object(Stream::new(xobject_dict, content))
}

/// New page that draws the body form, then the header form on top
fn create_composited_page(doc: &mut Document, body_form: ObjectId, header_form: ObjectId) -> ObjectId {
    let mut xobjects = Dictionary::new();
    xobjects.set(BODY_XOBJECT, Object::Reference(body_form));
    xobjects.set(HEADER_XOBJECT, Object::Reference(header_form));

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = format!(
        "q\n/{} Do\nQ\nq\n/{} Do\nQ\n",
        BODY_XOBJECT, HEADER_XOBJECT
    );
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Reference(content_id));

    doc.add_object(Object::Dictionary(page))
}

/// Give `to` the rotation and annotations of `from`, re-pointing each
/// annotation's `P` entry at its new page
fn carry_page_attributes(doc: &mut Document, from: ObjectId, to: ObjectId) -> Result<()> {
    let rotate = inherited_attribute(doc, from, b"Rotate");
    let annots = match doc.get_object(from)?.as_dict()?.get(b"Annots") {
        Ok(Object::Reference(id)) => doc.get_object(*id)?.as_array()?.clone(),
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    for annot in &annots {
        if let Object::Reference(id) = annot {
            if let Ok(dict) = doc.get_object_mut(*id).and_then(Object::as_dict_mut) {
                dict.set("P", Object::Reference(to));
            }
        }
    }

    let page = doc.get_object_mut(to)?.as_dict_mut()?;
    if let Some(rotate) = rotate {
        page.set("Rotate", rotate);
    }
    if !annots.is_empty() {
        debug!(count = annots.len(), "moving annotations to composited page");
        page.set("Annots", Object::Array(annots));
    }
    Ok(())
}
