//! [extraction::Document] implementation for PDF files, backed by pdfium and Tabula.

pub mod pdffile;
pub mod tabula_wrapper;

pub use pdffile::PdfFile;
pub use tabula_wrapper::{TabulaExtractor, singlethreaded::SingleThreadedTabulaExtractor};
