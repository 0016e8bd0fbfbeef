//! Seam between the extraction pipeline and the PDF libraries that decode pages, search text and
//! detect raw grids.

use anyhow::Result;

use crate::grid::Grid;

/// A single page of a loaded document.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// 0-based position of the page within the document.
    pub index: usize,
    /// Plain text extracted from the page.
    pub text: String,
    pub width: f32,
    pub height: f32,
}

impl Page {
    /// Placeholder for a page whose content could not be read. It never matches any keyword.
    pub fn blank(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Rectangular area of a page.
///
/// NOTE: The origin (0,0) is at the top left of the page, so for a valid [Region] the following
/// must be true: `left <= right && top <= bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Region {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Smallest region covering both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
            left: self.left.min(other.left),
            right: self.right.max(other.right),
        }
    }
}

/// Algorithm used by a [Document] to infer a grid within a region.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
pub enum GridMethod {
    /// Both axes inferred from ruling lines.
    #[strum(serialize = "lines")]
    RuledLines,
    /// Both axes inferred from the alignment of text; no ruling lines required.
    #[strum(serialize = "text")]
    TextAlignment,
    /// Ruling lines, accepting only grids where every row spans every column.
    #[strum(serialize = "lines-strict")]
    StrictRuledLines,
}

/// An opened document that the pipeline can query.
///
/// Implementations own the underlying document handle, and release it when dropped.
#[cfg_attr(test, mockall::automock)]
pub trait Document {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Reads the text and dimensions of the page at `index`.
    fn page(&self, index: usize) -> Result<Page>;

    /// Bounds of the first occurrence of `needle` on `page`, or `None` if it does not occur.
    fn search(&self, page: &Page, needle: &str) -> Result<Option<Region>>;

    /// Detects candidate grids within `region` of `page`.
    fn extract_grids(&self, page: &Page, region: &Region, method: GridMethod)
    -> Result<Vec<Grid>>;
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn page_count(&self) -> usize {
        self.as_ref().page_count()
    }

    fn page(&self, index: usize) -> Result<Page> {
        self.as_ref().page(index)
    }

    fn search(&self, page: &Page, needle: &str) -> Result<Option<Region>> {
        self.as_ref().search(page, needle)
    }

    fn extract_grids(
        &self,
        page: &Page,
        region: &Region,
        method: GridMethod,
    ) -> Result<Vec<Grid>> {
        self.as_ref().extract_grids(page, region, method)
    }
}
