//! [Document] over a PDF file: pdfium supplies page text, sizes and text positions, while Tabula
//! detects grids.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extraction::{Document, Grid, GridMethod, Page, Region};
use pdfium_render::prelude::{PdfDocument, PdfPage, PdfRect, Pdfium};

use crate::tabula_wrapper::{TabulaExtractionRequest, TabulaExtractor};

/// Most consecutive text segments that a single search needle may span.
const MAX_SPANNED_SEGMENTS: usize = 3;

/// An open PDF file. The pdfium document is closed when this is dropped.
pub struct PdfFile<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
    tabula: &'a dyn TabulaExtractor,
}

impl<'a> PdfFile<'a> {
    pub fn open(pdfium: &'a Pdfium, tabula: &'a dyn TabulaExtractor, path: &Path) -> Result<Self> {
        let document = pdfium
            .load_pdf_from_file(path, None)
            .with_context(|| format!("loading PDF {path:?}"))?;
        log::debug!("Opened {path:?} with {} page(s).", document.pages().len());
        Ok(Self {
            path: path.to_owned(),
            document,
            tabula,
        })
    }

    fn pdf_page(&self, index: usize) -> Result<PdfPage<'_>> {
        let index = u16::try_from(index).with_context(|| format!("page index {index} too large"))?;
        self.document
            .pages()
            .get(index)
            .with_context(|| format!("loading page {index}"))
    }
}

impl Document for PdfFile<'_> {
    fn page_count(&self) -> usize {
        usize::from(self.document.pages().len())
    }

    fn page(&self, index: usize) -> Result<Page> {
        let pdf_page = self.pdf_page(index)?;
        let text = pdf_page
            .text()
            .with_context(|| format!("reading text of page {index}"))?
            .all();
        Ok(Page {
            index,
            text,
            width: pdf_page.width().value,
            height: pdf_page.height().value,
        })
    }

    fn search(&self, page: &Page, needle: &str) -> Result<Option<Region>> {
        let pdf_page = self.pdf_page(page.index)?;
        let text = pdf_page
            .text()
            .with_context(|| format!("reading text of page {}", page.index))?;
        let segments: Vec<TextSegment> = text
            .segments()
            .iter()
            .map(|segment| TextSegment {
                text: segment.text(),
                region: to_region(&segment.bounds(), page.height),
            })
            .collect();
        Ok(find_text(&segments, needle))
    }

    fn extract_grids(&self, page: &Page, region: &Region, method: GridMethod) -> Result<Vec<Grid>> {
        let request =
            TabulaExtractionRequest::for_region(self.path.clone(), page.index, region, method)?;
        let tables = self
            .tabula
            .extract_tables(request)
            .with_context(|| format!("extracting {method} grids from page {}", page.index))?;
        Ok(tables.into_grids(method))
    }
}

impl Drop for PdfFile<'_> {
    fn drop(&mut self) {
        log::debug!("Closing {:?}.", self.path);
    }
}

/// Run of text on a page, with its bounds in top-left origin coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSegment {
    pub text: String,
    pub region: Region,
}

/// Converts pdfium bounds, which have a bottom-left origin, to a top-left origin [Region].
pub fn to_region(bounds: &PdfRect, page_height: f32) -> Region {
    Region {
        top: page_height - bounds.top.value,
        bottom: page_height - bounds.bottom.value,
        left: bounds.left.value,
        right: bounds.right.value,
    }
}

/// Bounds of the topmost (then leftmost) occurrence of `needle`, ignoring case.
///
/// A needle may straddle up to [MAX_SPANNED_SEGMENTS] consecutive segments, in which case the
/// bounds cover all of them.
pub fn find_text(segments: &[TextSegment], needle: &str) -> Option<Region> {
    let needle = needle.to_lowercase();
    let mut matches: Vec<Region> = Vec::new();

    for (start, first) in segments.iter().enumerate() {
        let mut joined = first.text.to_lowercase();
        let first_len = joined.len();
        let mut bounds = first.region;
        for segment in segments.iter().skip(start + 1).take(MAX_SPANNED_SEGMENTS - 1) {
            if joined.contains(&needle) {
                break;
            }
            joined.push_str(&segment.text.to_lowercase());
            bounds = bounds.union(&segment.region);
        }
        // Matches lying wholly within later segments are found from those segments.
        let within_later = joined.len() > first_len && joined[first_len..].contains(&needle);
        if joined.contains(&needle) && !within_later {
            matches.push(bounds);
        }
    }

    matches
        .into_iter()
        .min_by(|a, b| a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left)))
}
