//! PDF manipulation module

pub mod geometry;
pub mod page;
pub mod extract;
pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use geometry::{EffectiveBox, PageGeometry, Rect};
pub use extract::{extract_header, ExtractOptions};
pub use merge::{merge_header, MergeOptions, DEFAULT_HEADER_SCALE, DEFAULT_VERTICAL_OFFSET};
pub use metadata::{inspect, PdfInfo};
