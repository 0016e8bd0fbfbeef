//! Quality metrics, confidence and completeness verdict for an aligned table.

use indexmap::IndexMap;
use lazy_regex::regex_replace_all;
use serde::Serialize;

use crate::align::AlignedRow;

const NON_EMPTY_WEIGHT: f64 = 0.4;
const ROW_MATCH_WEIGHT: f64 = 0.4;
const NUMERIC_WEIGHT: f64 = 0.2;

/// Coverage and quality measures of one extracted table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetrics {
    pub non_empty_cells: usize,
    pub total_cells: usize,
    pub matched_rows: usize,
    pub expected_rows: usize,
    /// Rounded to two decimal places.
    pub numeric_parse_rate: f64,
    pub confidence: f64,
    #[serde(skip)]
    pub non_empty_ratio: f64,
    #[serde(skip)]
    pub row_match_rate: f64,
}

/// Three-level verdict on how much of a table's expected structure was recovered.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Completeness {
    Complete,
    Partial,
    #[default]
    Failed,
}

impl TableMetrics {
    /// Metrics of a table that stopped before alignment.
    pub fn empty(expected_rows: usize) -> Self {
        Self {
            expected_rows,
            ..Default::default()
        }
    }

    /// Measures aligned rows and their cell values against the expected table shape.
    pub fn compute(
        rows: &[AlignedRow],
        cells: &IndexMap<String, String>,
        expected_rows: usize,
        expected_columns: usize,
    ) -> Self {
        let total_cells = expected_rows * expected_columns;
        let values: Vec<&str> = cells
            .values()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect();
        let non_empty_cells = values.len();
        let matched_rows = rows.iter().filter(|row| row.matched).count();
        let parsed = values
            .iter()
            .filter(|value| parse_numeric(value).is_some())
            .count();

        let non_empty_ratio = ratio(non_empty_cells, total_cells);
        let row_match_rate = ratio(matched_rows, expected_rows);
        let numeric_parse_rate = ratio(parsed, non_empty_cells);
        let confidence = round2(
            NON_EMPTY_WEIGHT * non_empty_ratio
                + ROW_MATCH_WEIGHT * row_match_rate
                + NUMERIC_WEIGHT * numeric_parse_rate,
        );

        Self {
            non_empty_cells,
            total_cells,
            matched_rows,
            expected_rows,
            numeric_parse_rate: round2(numeric_parse_rate),
            confidence,
            non_empty_ratio,
            row_match_rate,
        }
    }

    pub fn completeness(&self) -> Completeness {
        if self.non_empty_ratio >= 0.60 && self.row_match_rate >= 0.90 && self.confidence >= 0.80
        {
            Completeness::Complete
        } else if self.non_empty_ratio >= 0.30 || self.row_match_rate >= 0.50 {
            Completeness::Partial
        } else {
            Completeness::Failed
        }
    }
}

/// Parses a cell value as a number, ignoring thousands separators and the `万`/`元` unit marks.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let cleaned = regex_replace_all!(r"[,，万元]", value, "");
    cleaned.trim().parse().ok()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
