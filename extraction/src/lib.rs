//! Schema-driven extraction of disclosure tables from annual-report PDFs.
//!
//! The pipeline runs locate → crop → detect → score → align → measure against a [Document],
//! degrading to partial or empty results per table rather than failing the whole document.

pub mod align;
pub mod detect;
pub mod document;
pub mod failure;
pub mod grid;
pub mod locate;
pub mod metrics;
pub mod options;
pub mod orchestrator;
pub mod result;
pub mod schema;
pub mod score;
#[cfg(any(test, feature = "testing"))]
pub mod testutil;

pub use document::{Document, GridMethod, Page, Region};
pub use grid::{Grid, GridRow};
pub use options::{CandidateFallback, ExtractOptions};
pub use orchestrator::{Extractor, panic_message};
pub use result::{AggregateResult, ExtractionResult, Runtime};
pub use schema::Schema;

/// Returns `true` if `needle` occurs within `haystack`, ignoring case.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
