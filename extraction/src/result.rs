//! Serializable per-table and per-document extraction results.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    align::{AlignedRow, Alignment},
    failure::{DocumentFailure, TableFailure},
    metrics::{Completeness, TableMetrics},
    schema::{ColumnDescriptor, Schema, TableDef},
};

/// Tag identifying the extraction engine family in the output.
pub const SOURCE_TAG: &str = "python";

/// Extracted data and quality measures of one schema table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub id: String,
    pub section: String,
    pub rows: Vec<RowOutcome>,
    pub columns: Vec<ColumnDescriptor>,
    pub cells: IndexMap<String, String>,
    pub metrics: TableMetrics,
    pub confidence: f64,
    pub completeness: Completeness,
    pub issues: Vec<String>,
    pub source: &'static str,
    /// Full alignment detail, kept for callers inspecting where rows came from.
    #[serde(skip)]
    pub aligned_rows: Vec<AlignedRow>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RowOutcome {
    pub key: String,
    pub matched: bool,
}

impl ExtractionResult {
    /// Result of a table whose rows were aligned against a selected grid.
    pub fn aligned(table: &TableDef, schema: &Schema, alignment: Alignment) -> Self {
        let metrics = TableMetrics::compute(
            &alignment.rows,
            &alignment.cells,
            schema.rows.len(),
            schema.columns.len(),
        );
        Self {
            id: table.id.clone(),
            section: table.section.clone(),
            rows: alignment
                .rows
                .iter()
                .map(|row| RowOutcome {
                    key: row.key.clone(),
                    matched: row.matched,
                })
                .collect(),
            columns: schema.columns.clone(),
            cells: alignment.cells,
            confidence: metrics.confidence,
            completeness: metrics.completeness(),
            metrics,
            issues: alignment.issues,
            source: SOURCE_TAG,
            aligned_rows: alignment.rows,
        }
    }

    /// Result of a table that stopped before alignment.
    pub fn failed(table: &TableDef, schema: &Schema, failure: &TableFailure) -> Self {
        Self {
            id: table.id.clone(),
            section: table.section.clone(),
            rows: Vec::new(),
            columns: schema.columns.clone(),
            cells: IndexMap::new(),
            metrics: TableMetrics::empty(schema.rows.len()),
            confidence: 0.0,
            completeness: Completeness::Failed,
            issues: vec![failure.issue_code()],
            source: SOURCE_TAG,
            aligned_rows: Vec::new(),
        }
    }
}

/// Document-level counters.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DocumentMetrics {
    pub total_pages: usize,
    pub pages_searched: usize,
    pub tables_found: usize,
}

/// How the extraction was run. Only emitted on request, since it varies between runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Runtime {
    pub engine: String,
    pub elapsed_ms: u64,
}

/// Everything extracted from one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub tables: Vec<ExtractionResult>,
    pub metrics: DocumentMetrics,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Runtime>,
    /// Index of the page the tables were extracted from.
    #[serde(skip)]
    pub page: Option<usize>,
}

impl AggregateResult {
    /// Result of a document for which no tables were attempted.
    pub fn failed(total_pages: usize, failure: &DocumentFailure) -> Self {
        Self {
            metrics: DocumentMetrics {
                total_pages,
                ..Default::default()
            },
            issues: failure.issue_codes(),
            ..Default::default()
        }
    }

    pub fn push_table(&mut self, table: ExtractionResult) {
        self.tables.push(table);
        self.metrics.tables_found = self.tables.len();
    }
}
