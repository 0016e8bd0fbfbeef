//! In-memory [Document] and schema fixtures for exercising the pipeline without a PDF backend.

use std::{cell::Cell, collections::HashMap, rc::Rc};

use anyhow::{Result, anyhow};

use crate::{Document, Grid, GridMethod, Page, Region, Schema};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Page of A4 size holding `text`.
pub fn text_page(index: usize, text: &str) -> Page {
    Page {
        index,
        text: text.into(),
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
    }
}

/// Schema for the "active disclosure" table found in annual disclosure reports: three rows, two
/// columns.
pub fn disclosure_schema() -> Schema {
    Schema::from_json(DISCLOSURE_SCHEMA_JSON).expect("fixture schema should be valid")
}

pub const DISCLOSURE_SCHEMA_JSON: &str = r#"{
    "locateKeywords": ["表2：主动公开政府信息情况"],
    "tables": [
        {"id": "active_disclosure", "section": "二", "locateKeyword": "主动公开政府信息情况"}
    ],
    "rows": [
        {"key": "rules", "label": "规章", "match": "规章"},
        {"key": "normative", "label": "规范性文件"},
        {"key": "permits", "label": "行政许可", "match": "行政许可"}
    ],
    "columns": [
        {"key": "name", "name": "信息内容", "type": "string"},
        {"key": "count", "name": "本年新制发件数", "type": "number"}
    ]
}"#;

type GridKey = (usize, GridMethod);

/// Scripted [Document]. Anything not scripted behaves as absent: unknown searches find nothing
/// and unknown grid extractions find no grids.
#[derive(Default)]
pub struct FakeDocument {
    pages: Vec<Result<Page, String>>,
    search_hits: HashMap<(usize, String), Region>,
    failing_searches: HashMap<(usize, String), String>,
    panicking_searches: HashMap<(usize, String), String>,
    grids: HashMap<GridKey, Result<Vec<Grid>, String>>,
    drops: Rc<Cell<usize>>,
}

impl FakeDocument {
    /// Document with one A4 page per entry of `texts`.
    pub fn with_pages<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut document = Self::default();
        document.pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Ok(text_page(index, text)))
            .collect();
        document
    }

    /// Makes loading page `index` fail.
    pub fn page_fails(mut self, index: usize, message: &str) -> Self {
        self.pages[index] = Err(message.into());
        self
    }

    pub fn search_hit(mut self, page: usize, needle: &str, region: Region) -> Self {
        self.search_hits.insert((page, needle.into()), region);
        self
    }

    pub fn search_fails(mut self, page: usize, needle: &str, message: &str) -> Self {
        self.failing_searches
            .insert((page, needle.into()), message.into());
        self
    }

    pub fn search_panics(mut self, page: usize, needle: &str, message: &str) -> Self {
        self.panicking_searches
            .insert((page, needle.into()), message.into());
        self
    }

    pub fn grids(mut self, page: usize, method: GridMethod, grids: Vec<Grid>) -> Self {
        self.grids.insert((page, method), Ok(grids));
        self
    }

    pub fn grids_fail(mut self, page: usize, method: GridMethod, message: &str) -> Self {
        self.grids.insert((page, method), Err(message.into()));
        self
    }

    /// Counter incremented each time this document is dropped.
    pub fn drop_counter(&self) -> Rc<Cell<usize>> {
        self.drops.clone()
    }
}

impl Document for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page> {
        match self.pages.get(index) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("page {index} out of range")),
        }
    }

    fn search(&self, page: &Page, needle: &str) -> Result<Option<Region>> {
        let key = (page.index, needle.to_string());
        if let Some(message) = self.panicking_searches.get(&key) {
            panic!("{message}");
        }
        if let Some(message) = self.failing_searches.get(&key) {
            return Err(anyhow!("{message}"));
        }
        Ok(self.search_hits.get(&key).copied())
    }

    fn extract_grids(
        &self,
        page: &Page,
        _region: &Region,
        method: GridMethod,
    ) -> Result<Vec<Grid>> {
        match self.grids.get(&(page.index, method)) {
            Some(Ok(grids)) => Ok(grids.clone()),
            Some(Err(message)) => Err(anyhow!("{message}")),
            None => Ok(Vec::new()),
        }
    }
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
