//! Resume Editor Library
//!
//! Reuses a resume's header block across revisions of the resume.
//! This library provides functionality to:
//! - Extract the header band from page 1 of an existing resume
//! - Composite a header onto the first page of a header-less resume
//! - Inspect page counts and page boxes
//!
//! # Example
//!
//! ```no_run
//! use resume_editor::pdf::{extract_header, merge_header, ExtractOptions, MergeOptions};
//! use resume_editor::reflow::Pdftocairo;
//! use std::path::PathBuf;
//!
//! let reflower = Pdftocairo::locate().expect("pdftocairo not installed");
//! let header = extract_header(
//!     &ExtractOptions {
//!         source: PathBuf::from("old-resume.pdf"),
//!         page_count: 1,
//!         output_base: "header_1_old-resume".to_string(),
//!         ..Default::default()
//!     },
//!     &reflower,
//! ).expect("Failed to extract header");
//!
//! merge_header(&MergeOptions {
//!     header_path: header,
//!     template_path: PathBuf::from("new-resume.pdf"),
//!     page_count: 1,
//!     output_base: "output_1_new-resume".to_string(),
//!     ..Default::default()
//! }).expect("Failed to merge header");
//! ```

pub mod error;
pub mod layout;
pub mod naming;
pub mod pdf;
pub mod reflow;

// Re-export commonly used items
pub use error::{Error, Result};
