pub mod singlethreaded;

use std::path::PathBuf;

use anyhow::Result;
use extraction::{Grid, GridMethod, GridRow, Region};
use serde::Deserialize;

/// Required trait for making a single batch extraction call to Tabula for table(s) extraction.
pub trait TabulaExtractor {
    fn extract_tables(&self, request: TabulaExtractionRequest) -> Result<JsonTableSet>;
}

/// Single request to a [TabulaExtractor] to batch extract tables from a PDF file.
pub struct TabulaExtractionRequest {
    pub pdf_path: PathBuf,
    pub password: Option<String>,
    /// 1-based page number.
    pub page: i32,
    pub guess: bool,
    pub use_returns: bool,
    pub page_areas: Vec<(i32, tabula::Rectangle)>,
    pub method: tabula::ExtractionMethod,
}

impl TabulaExtractionRequest {
    /// Request for the tables within `region` of the 0-based page `page_index`.
    pub fn for_region(
        pdf_path: PathBuf,
        page_index: usize,
        region: &Region,
        method: GridMethod,
    ) -> Result<Self> {
        Ok(Self {
            pdf_path,
            password: None,
            page: i32::try_from(page_index + 1)?,
            guess: false,
            use_returns: false,
            page_areas: vec![page_area(region)],
            method: extraction_method(method),
        })
    }
}

/// Tabula algorithm implementing `method`. Strict ruled lines post-filter the lattice output.
pub fn extraction_method(method: GridMethod) -> tabula::ExtractionMethod {
    match method {
        GridMethod::RuledLines | GridMethod::StrictRuledLines => {
            tabula::ExtractionMethod::Spreadsheet
        }
        GridMethod::TextAlignment => tabula::ExtractionMethod::Basic,
    }
}

/// Absolute Tabula page area covering `region`. Both use a top-left origin.
pub fn page_area(region: &Region) -> (i32, tabula::Rectangle) {
    (
        tabula::ABSOLUTE_AREA_CALCULATION_MODE,
        tabula::Rectangle::from_coords(region.left, region.top, region.right, region.bottom),
    )
}

/// A sequence of extracted tables from a PDF file.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct JsonTableSet(pub Vec<JsonTable>);

impl JsonTableSet {
    /// Converts the extracted tables to grids, applying any filtering that `method` implies.
    pub fn into_grids(self, method: GridMethod) -> Vec<Grid> {
        self.0
            .into_iter()
            .map(JsonTable::into_grid)
            .filter(|grid| method != GridMethod::StrictRuledLines || grid.is_rectangular())
            .collect()
    }
}

/// A single extracted table from a PDF file.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct JsonTable {
    pub extraction_method: String,
    pub page_number: i32,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub right: f32,
    pub bottom: f32,
    pub data: Vec<JsonRow>,
}

impl JsonTable {
    pub fn into_grid(self) -> Grid {
        Grid(self.data.into_iter().map(JsonRow::into_grid_row).collect())
    }
}

/// A single extracted table row from a PDF file.
#[derive(Deserialize, Debug)]
pub struct JsonRow(pub Vec<JsonCell>);

impl JsonRow {
    pub fn into_grid_row(self) -> GridRow {
        GridRow(self.0.into_iter().map(|cell| cell.text).collect())
    }
}

/// A single extracted table cell from a PDF file.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct JsonCell {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}
