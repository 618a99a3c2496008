//! Page lookup and page tree helpers shared by both pipelines

use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Load a PDF, reporting a missing file as [`Error::MissingFile`]
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    let doc = Document::load(path)?;
    debug!(path = %path.display(), pages = doc.get_pages().len(), "loaded PDF");
    Ok(doc)
}

/// Object ID of 1-based page `index`
pub fn page_id(doc: &Document, path: &Path, index: u32) -> Result<ObjectId> {
    let pages = doc.get_pages();
    pages.get(&index).copied().ok_or_else(|| Error::InvalidPageIndex {
        path: path.to_path_buf(),
        index,
        available: pages.len(),
    })
}

/// Look up a page attribute, walking up the `Parent` chain when the page
/// itself does not carry it. Indirect values are resolved.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    // Guard against Parent cycles in broken files
    let mut depth = 0;

    while let Some(node_id) = current {
        if depth > 64 {
            break;
        }
        depth += 1;

        let node = doc.get_object(node_id).ok()?.as_dict().ok()?;
        if let Ok(value) = node.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Copy inherited attributes onto the page so it survives being moved into a
/// new page tree. A value the ancestor holds by reference is copied resolved.
pub fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut found: Vec<(&[u8], Object)> = Vec::new();
    {
        let page = doc.get_object(page_id)?.as_dict()?;
        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            let parent = match page.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent) => parent,
                Err(_) => break,
            };
            if let Some(value) = inherited_attribute(doc, parent, key) {
                found.push((key, value));
            }
        }
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    for (key, value) in found {
        page.set(key.to_vec(), value);
    }
    Ok(())
}

/// Decoded content of every stream in a page's `Contents`, one after another.
///
/// Streams are joined with a newline: a stream may end mid-line, and gluing it
/// straight onto the next one can fuse two operators into one.
pub fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    for stream_id in doc.get_page_contents(page_id) {
        let stream = doc.get_object(stream_id)?.as_stream()?;
        let bytes = if stream.dict.has(b"Filter") {
            stream.decompressed_content()?
        } else {
            stream.content.clone()
        };
        if !content.is_empty() {
            content.push(b'\n');
        }
        content.extend_from_slice(&bytes);
    }
    Ok(content)
}

/// Content bytes and resources of a page, ready to wrap in a Form XObject
pub fn page_content_and_resources(doc: &Document, page_id: ObjectId) -> Result<(Vec<u8>, Object)> {
    let content = page_content(doc, page_id)?;
    let resources = inherited_attribute(doc, page_id, b"Resources")
        .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));
    Ok((content, resources))
}

/// Replace the document's page tree with one holding exactly `page_ids`, in
/// order, then drop every object no longer reachable from the trailer.
pub fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in page_ids {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("Parent", Object::Reference(pages_id));
    }

    let pruned = doc.prune_objects();
    debug!(pages = page_ids.len(), pruned = pruned.len(), "rebuilt page tree");
    Ok(())
}

/// Keep only the first page of `doc`
pub fn isolate_first_page(doc: &mut Document, path: &Path) -> Result<ObjectId> {
    let first = page_id(doc, path, 1)?;
    materialize_inherited(doc, first)?;
    rebuild_page_tree(doc, &[first])?;
    Ok(first)
}

/// Compress and write a document
pub fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    doc.compress();
    doc.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;

    /// Two pages whose MediaBox and Resources live on the Pages node
    fn inherited_doc() -> (Document, Vec<ObjectId>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut ids = Vec::new();
        for text in ["page one", "page two"] {
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                format!("% {}\n", text).into_bytes(),
            ));
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content_id));
            ids.push(doc.add_object(Object::Dictionary(page)));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(2));
        pages.set("Kids", Object::Array(ids.iter().map(|&id| Object::Reference(id)).collect()));
        pages.set("MediaBox", Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]));
        pages.set("Resources", Object::Dictionary(Dictionary::new()));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        (doc, ids)
    }

    #[test]
    fn test_page_id_out_of_range() {
        let (doc, _) = inherited_doc();
        let result = page_id(&doc, Path::new("t.pdf"), 3);
        match result {
            Err(Error::InvalidPageIndex { index, available, .. }) => {
                assert_eq!(index, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected InvalidPageIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_inherited_media_box() {
        let (doc, ids) = inherited_doc();
        let media = inherited_attribute(&doc, ids[0], b"MediaBox").expect("inherited MediaBox");
        assert_eq!(media.as_array().unwrap().len(), 4);
        assert!(inherited_attribute(&doc, ids[0], b"CropBox").is_none());
    }

    #[test]
    fn test_isolate_first_page_keeps_inherited_box() {
        let (mut doc, ids) = inherited_doc();
        let first = isolate_first_page(&mut doc, Path::new("t.pdf")).unwrap();

        assert_eq!(first, ids[0]);
        assert_eq!(doc.get_pages().len(), 1);

        let page = doc.get_object(first).unwrap().as_dict().unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        // The second page is no longer reachable and gets pruned
        assert!(doc.get_object(ids[1]).is_err());
    }

    #[test]
    fn test_page_content_separates_streams() {
        let (mut doc, ids) = inherited_doc();
        // Neither stream ends in whitespace
        let first = doc.add_object(Stream::new(
            Dictionary::new(),
            b"q 1 0 0 RG 10 10 m 100 100 l S Q".to_vec(),
        ));
        let second = doc.add_object(Stream::new(
            Dictionary::new(),
            b"q 0 0 1 RG 20 20 m 200 200 l S Q".to_vec(),
        ));
        doc.get_object_mut(ids[0]).unwrap().as_dict_mut().unwrap().set(
            "Contents",
            Object::Array(vec![Object::Reference(first), Object::Reference(second)]),
        );

        let content = String::from_utf8(page_content(&doc, ids[0]).unwrap()).unwrap();
        assert_eq!(
            content,
            "q 1 0 0 RG 10 10 m 100 100 l S Q\nq 0 0 1 RG 20 20 m 200 200 l S Q"
        );
        assert!(!content.contains("Qq"));
    }

    #[test]
    fn test_page_content_decodes_compressed_stream() {
        let (mut doc, ids) = inherited_doc();
        let mut stream = Stream::new(Dictionary::new(), b"q 1 0 0 RG 10 10 m 100 100 l S Q ".repeat(20));
        stream.compress().unwrap();
        assert!(stream.dict.has(b"Filter"));
        let stream_id = doc.add_object(stream);
        doc.get_object_mut(ids[0]).unwrap().as_dict_mut().unwrap()
            .set("Contents", Object::Reference(stream_id));

        let content = page_content(&doc, ids[0]).unwrap();
        assert!(content.starts_with(b"q 1 0 0 RG"));
        assert_eq!(content.len(), 33 * 20);
    }

    #[test]
    fn test_load_document_missing_file() {
        let result = load_document(Path::new("does-not-exist.pdf"));
        assert!(matches!(result, Err(Error::MissingFile(_))));
    }
}
