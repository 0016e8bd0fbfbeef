//! Alignment of the schema's expected rows against the body rows of the selected grid.

use indexmap::IndexMap;

use crate::{
    Grid, contains_ignore_case,
    failure::row_not_matched,
    schema::{ColumnDescriptor, RowDescriptor},
};

/// Outcome of aligning one schema row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlignedRow {
    pub key: String,
    pub matched: bool,
    /// Index within the grid of the body row that matched.
    pub source_row: Option<usize>,
    /// Raw cells of the matched body row.
    pub cells: Option<Vec<String>>,
}

/// Aligned rows in schema order, with the cell values and issues they produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Alignment {
    pub rows: Vec<AlignedRow>,
    /// Values keyed by `<rowKey>_<colKey>`, in schema order.
    pub cells: IndexMap<String, String>,
    pub issues: Vec<String>,
}

/// Key under which the value at (`row_key`, `column_key`) is reported.
pub fn cell_key(row_key: &str, column_key: &str) -> String {
    format!("{row_key}_{column_key}")
}

/// Aligns every schema row to the first body row whose leading cell contains its match string.
///
/// Column values are taken positionally from the matched row, with missing trailing cells
/// reported as empty strings. Unmatched rows contribute no cells and a `row_not_matched` issue.
pub fn align_rows(grid: &Grid, rows: &[RowDescriptor], columns: &[ColumnDescriptor]) -> Alignment {
    let mut alignment = Alignment::default();

    for row in rows {
        let target = grid.body().find(|(_, body_row)| {
            body_row
                .leading()
                .is_some_and(|leading| contains_ignore_case(leading, &row.matcher))
        });

        let Some((source_row, body_row)) = target else {
            log::debug!("Row {:?} matched no body row.", row.key);
            alignment.issues.push(row_not_matched(&row.key));
            alignment.rows.push(AlignedRow {
                key: row.key.clone(),
                matched: false,
                source_row: None,
                cells: None,
            });
            continue;
        };

        for (index, column) in columns.iter().enumerate() {
            alignment.cells.insert(
                cell_key(&row.key, &column.key),
                body_row.cell_or_empty(index).to_string(),
            );
        }
        alignment.rows.push(AlignedRow {
            key: row.key.clone(),
            matched: true,
            source_row: Some(source_row),
            cells: Some(body_row.to_vec()),
        });
    }

    alignment
}
