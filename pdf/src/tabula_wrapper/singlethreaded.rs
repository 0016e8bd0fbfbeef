use anyhow::Context;

use crate::tabula_wrapper::{JsonTableSet, TabulaExtractionRequest, TabulaExtractor};

/// Single threaded implementation of [TabulaExtractor].
///
/// Must be created and run on the thread that attached to the Tabula VM.
pub struct SingleThreadedTabulaExtractor<'env> {
    tabula_env: tabula::TabulaEnv<'env>,
}

impl<'env> SingleThreadedTabulaExtractor<'env> {
    /// Creates a [SingleThreadedTabulaExtractor] with the given [tabula::TabulaEnv].
    pub fn new(tabula_env: tabula::TabulaEnv<'env>) -> Self {
        Self { tabula_env }
    }
}

impl<'env> TabulaExtractor for SingleThreadedTabulaExtractor<'env> {
    fn extract_tables(&self, request: TabulaExtractionRequest) -> anyhow::Result<JsonTableSet> {
        log::trace!(
            "Running Tabula on page {} of {:?}.",
            request.page,
            request.pdf_path
        );
        let tabula = self
            .tabula_env
            .configure_tabula(
                Some(&request.page_areas),
                Some(&[request.page]),
                tabula::OutputFormat::Json,
                request.guess,
                request.method,
                request.use_returns,
                request.password.as_deref(),
            )
            .context("configuring Tabula to extract table")?;

        let extracted_file = tempfile::NamedTempFile::new()
            .context("creating temporary file for extracting PDF table data")?;
        tabula
            .parse_document_into(&request.pdf_path, extracted_file.path())
            .context("extracting PDF table data")?;

        serde_json::from_reader(extracted_file).context("parsing extracted PDF table data")
    }
}
