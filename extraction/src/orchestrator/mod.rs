//! Runs the full pipeline over one document and every table of a schema.

#[cfg(test)]
mod tests;

use std::{any::Any, panic::AssertUnwindSafe};

use crate::{
    Document, ExtractOptions, Page, Schema,
    align::align_rows,
    detect::TableDetector,
    failure::{DocumentFailure, Stage, TableFailure},
    locate::{locate_page, locate_region},
    result::{AggregateResult, DocumentMetrics, ExtractionResult},
    schema::TableDef,
    score::select_candidate,
};

/// Extracts a schema's tables from documents.
pub struct Extractor<'a> {
    schema: &'a Schema,
    options: &'a ExtractOptions,
}

impl<'a> Extractor<'a> {
    pub fn new(schema: &'a Schema, options: &'a ExtractOptions) -> Self {
        Self { schema, options }
    }

    /// Opens a document with `open` and extracts every table from it.
    ///
    /// The document is owned by this call and dropped before it returns, whether extraction
    /// succeeds, records failures, or unwinds.
    pub fn extract_document<D, F>(&self, open: F) -> AggregateResult
    where
        D: Document,
        F: FnOnce() -> anyhow::Result<D>,
    {
        let document = match open() {
            Ok(document) => document,
            Err(err) => {
                log::warn!("Failed to open document: {err:#}");
                return AggregateResult::failed(
                    0,
                    &DocumentFailure::OpenFailed(format!("{err:#}")),
                );
            }
        };
        self.extract_from(&document)
    }

    /// Extracts every table from an already opened document.
    pub fn extract_from<D>(&self, document: &D) -> AggregateResult
    where
        D: Document + ?Sized,
    {
        let pages = load_pages(document);
        let total_pages = pages.len();

        let located = match locate_page(&pages, &self.schema.locate_keywords) {
            Ok(located) => located,
            Err(failure) => {
                log::warn!("{failure}");
                return AggregateResult::failed(total_pages, &failure);
            }
        };
        let Some(page) = pages.get(located.index) else {
            return AggregateResult::failed(total_pages, &DocumentFailure::PageNotFound);
        };

        let mut aggregate = AggregateResult {
            metrics: DocumentMetrics {
                total_pages,
                pages_searched: total_pages,
                tables_found: 0,
            },
            page: Some(located.index),
            ..Default::default()
        };
        for table in &self.schema.tables {
            let result = self.guarded_extract_table(document, page, table);
            log::info!(
                "Table {:?}: {} (confidence {:.2}).",
                table.id,
                result.completeness,
                result.confidence
            );
            aggregate.push_table(result);
        }
        aggregate
    }

    fn guarded_extract_table<D>(
        &self,
        document: &D,
        page: &Page,
        table: &TableDef,
    ) -> ExtractionResult
    where
        D: Document + ?Sized,
    {
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.extract_table(document, page, table)
        }));

        let failure = match outcome {
            Ok(Ok(result)) => return result,
            Ok(Err(failure)) => failure,
            Err(payload) => TableFailure::internal(Stage::ExtractTable, panic_message(&*payload)),
        };
        log::warn!("Table {:?}: {failure}", table.id);
        ExtractionResult::failed(table, self.schema, &failure)
    }

    fn extract_table<D>(
        &self,
        document: &D,
        page: &Page,
        table: &TableDef,
    ) -> Result<ExtractionResult, TableFailure>
    where
        D: Document + ?Sized,
    {
        let Schema { rows, columns, .. } = self.schema;

        let region = locate_region(document, page, &table.anchor, self.options.region_margin)?;
        let detection =
            TableDetector::new(&self.options.strategies).detect(document, page, &region)?;
        let selection = select_candidate(
            &detection.candidates,
            rows,
            columns,
            self.options.candidate_fallback,
        )?;
        log::debug!(
            "Table {:?}: selected candidate {} of {} from strategy {:?} (score {:.2}).",
            table.id,
            selection.index,
            detection.candidates.len(),
            detection.strategy,
            selection.score
        );

        let grid = detection
            .candidates
            .get(selection.index)
            .ok_or(TableFailure::NoCandidateMatched)?;
        let alignment = align_rows(grid, rows, columns);
        Ok(ExtractionResult::aligned(table, self.schema, alignment))
    }
}

/// Reads every page, substituting a blank page for any that fails to load.
fn load_pages<D>(document: &D) -> Vec<Page>
where
    D: Document + ?Sized,
{
    (0..document.page_count())
        .map(|index| {
            document.page(index).unwrap_or_else(|err| {
                log::warn!("Failed to read page {index}: {err:#}");
                Page::blank(index)
            })
        })
        .collect()
}

/// Text carried by a panic payload, for reporting caught panics.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".into()
    }
}
