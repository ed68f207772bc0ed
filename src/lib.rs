//! Structural pattern detection for parsed HTML documents.
//!
//! Given an already-parsed markup tree, this crate extracts a flat,
//! depth-annotated element sequence, derives a hashable structural signature
//! per element, and groups elements into repeating patterns — the raw
//! material for pulling structured records out of semi-structured pages
//! without hand-written selectors.
//!
//! The crate performs no I/O: fetching and parsing happen on the caller's
//! side (any `scraper::Html` works, or anything implementing [`DomNode`]).
//! Everything is synchronous, deterministic, and single-threaded per
//! [`DocumentModel`]; independent models parallelize freely.
//!
//! ```no_run
//! use page_patterns::{DetectOptions, DocumentModel};
//! use scraper::Html;
//!
//! # fn main() -> page_patterns::AnalysisResult<()> {
//! let html = Html::parse_document("<html>...</html>");
//! let mut doc = DocumentModel::new(html);
//!
//! let stats = doc.stats()?;
//! println!("{} elements, avg depth {:.2}", stats.total_elements, stats.average_depth);
//!
//! for pattern in doc.detect_patterns(&DetectOptions::default())?.iter() {
//!     println!("{} x{} ({:.2})", pattern.signature, pattern.count, pattern.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod document;
pub mod dom;
pub mod error;
pub mod models;

pub use analyze::detect::{
    detect, DetectOptions, BOILERPLATE_TAGS, DEFAULT_THRESHOLD, MAX_NESTING_DEPTH,
};
pub use analyze::extract::{extract_elements, MAX_TREE_DEPTH, TEXT_LIMIT};
pub use analyze::signature::{classes_hash, signature_of, SIGNATURE_HASH_LEN};
pub use document::DocumentModel;
pub use dom::DomNode;
pub use error::{AnalysisError, AnalysisResult};
pub use models::{
    DocumentStats, ElementRecord, ElementSignature, ElementType, PatternInfo, PatternSet,
};
