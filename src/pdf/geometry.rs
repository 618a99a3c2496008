//! Page box geometry
//!
//! PDF rectangles are `[llx lly urx ury]` arrays in default user space (points,
//! origin at the bottom-left). The corner setters below each touch exactly the
//! two coordinates that make up that corner, so `set_lower_right((x, y))`
//! changes `urx` and `lly` and nothing else.

use lopdf::{Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::pdf::page::inherited_attribute;

/// Box keys that [`EffectiveBox`] writes, media box first
pub const ALL_BOX_KEYS: [&str; 5] = ["MediaBox", "CropBox", "BleedBox", "TrimBox", "ArtBox"];

/// A PDF rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl Rect {
    pub fn new(llx: f32, lly: f32, urx: f32, ury: f32) -> Self {
        Self { llx, lly, urx, ury }
    }

    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    pub fn lower_left(&self) -> (f32, f32) {
        (self.llx, self.lly)
    }

    pub fn lower_right(&self) -> (f32, f32) {
        (self.urx, self.lly)
    }

    pub fn upper_left(&self) -> (f32, f32) {
        (self.llx, self.ury)
    }

    pub fn upper_right(&self) -> (f32, f32) {
        (self.urx, self.ury)
    }

    pub fn set_lower_left(&mut self, (x, y): (f32, f32)) {
        self.llx = x;
        self.lly = y;
    }

    pub fn set_lower_right(&mut self, (x, y): (f32, f32)) {
        self.urx = x;
        self.lly = y;
    }

    pub fn set_upper_left(&mut self, (x, y): (f32, f32)) {
        self.llx = x;
        self.ury = y;
    }

    pub fn set_upper_right(&mut self, (x, y): (f32, f32)) {
        self.urx = x;
        self.ury = y;
    }

    /// Same rectangle with lower-left <= upper-right on both axes
    pub fn normalized(&self) -> Self {
        Self {
            llx: self.llx.min(self.urx),
            lly: self.lly.min(self.ury),
            urx: self.llx.max(self.urx),
            ury: self.lly.max(self.ury),
        }
    }

    /// Uniform scale about the origin
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            llx: self.llx * factor,
            lly: self.lly * factor,
            urx: self.urx * factor,
            ury: self.ury * factor,
        }
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        Self {
            llx: a.llx.min(b.llx),
            lly: a.lly.min(b.lly),
            urx: a.urx.max(b.urx),
            ury: a.ury.max(b.ury),
        }
    }

    /// Pull every edge inside `bounds`
    pub fn clamped_to(&self, bounds: &Rect) -> Self {
        let b = bounds.normalized();
        let r = self.normalized();
        Self {
            llx: r.llx.clamp(b.llx, b.urx),
            lly: r.lly.clamp(b.lly, b.ury),
            urx: r.urx.clamp(b.llx, b.urx),
            ury: r.ury.clamp(b.lly, b.ury),
        }
    }

    /// True if `other` lies inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        b.llx >= a.llx && b.lly >= a.lly && b.urx <= a.urx && b.ury <= a.ury
    }

    /// Parse a `[llx lly urx ury]` array
    pub fn from_object(object: &Object) -> Result<Self> {
        let values = object
            .as_array()
            .map_err(|_| Error::General(format!("Page box is not an array: {:?}", object)))?;

        if values.len() != 4 {
            return Err(Error::General(format!(
                "Page box must have 4 numbers, found {}",
                values.len()
            )));
        }

        let mut coords = [0.0f32; 4];
        for (slot, value) in coords.iter_mut().zip(values) {
            *slot = value
                .as_float()
                .map_err(|_| Error::General(format!("Page box entry is not a number: {:?}", value)))?;
        }

        Ok(Self::new(coords[0], coords[1], coords[2], coords[3]))
    }

    pub fn to_object(&self) -> Object {
        Object::Array(vec![
            Object::Real(self.llx),
            Object::Real(self.lly),
            Object::Real(self.urx),
            Object::Real(self.ury),
        ])
    }
}

/// Read a page box, following the page tree for inherited values
pub fn read_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Rect>> {
    match inherited_attribute(doc, page_id, key) {
        Some(object) => Ok(Some(Rect::from_object(&object)?)),
        None => Ok(None),
    }
}

/// Media box and crop box of a single page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub media_box: Rect,
    pub crop_box: Rect,
}

impl PageGeometry {
    /// Read the page's boxes. A missing crop box defaults to the media box.
    pub fn read(doc: &Document, page_id: ObjectId) -> Result<Self> {
        let media_box = read_box(doc, page_id, b"MediaBox")?
            .ok_or_else(|| Error::General(format!("Page {:?} has no MediaBox", page_id)))?;
        let crop_box = read_box(doc, page_id, b"CropBox")?.unwrap_or(media_box);
        Ok(Self { media_box, crop_box })
    }

    /// Crop box as it will be written: never outside the media box
    pub fn effective_crop_box(&self) -> Rect {
        self.crop_box.clamped_to(&self.media_box)
    }

    /// Write both boxes onto the page itself
    pub fn write(&self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("MediaBox", self.media_box.to_object());
        page.set("CropBox", self.effective_crop_box().to_object());
        Ok(())
    }
}

/// One rectangle standing in for every page box.
///
/// Writing it sets MediaBox, CropBox, BleedBox, TrimBox and ArtBox to the same
/// value, so no bleed/trim/art margin survives on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveBox(Rect);

impl EffectiveBox {
    pub fn new(rect: Rect) -> Self {
        Self(rect)
    }

    pub fn rect(&self) -> Rect {
        self.0
    }

    pub fn write(&self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        for key in ALL_BOX_KEYS {
            page.set(key, self.0.to_object());
        }
        Ok(())
    }
}
