//! Ranking of candidate grids by how well they resemble the schema's tables.

use crate::{
    CandidateFallback, Grid, contains_ignore_case,
    failure::TableFailure,
    schema::{ColumnDescriptor, RowDescriptor},
};

/// Winning candidate and its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub score: f64,
}

/// Scores how well `grid` matches the expected columns and rows, in `[0, 1]`.
///
/// Each column whose name occurs in a non-empty header cell earns a point, as does each row
/// whose match string occurs in the leading cell of some body row. The score is the fraction of
/// points earned.
pub fn score_candidate(grid: &Grid, rows: &[RowDescriptor], columns: &[ColumnDescriptor]) -> f64 {
    let possible = rows.len() + columns.len();
    if possible == 0 {
        return 0.0;
    }
    let Some(header) = grid.header().filter(|header| !header.is_empty()) else {
        return 0.0;
    };

    let column_hits = columns
        .iter()
        .filter(|column| {
            header
                .iter()
                .filter(|cell| !cell.trim().is_empty())
                .any(|cell| contains_ignore_case(cell, &column.name))
        })
        .count();

    let row_hits = rows
        .iter()
        .filter(|row| {
            grid.body().any(|(_, body_row)| {
                body_row
                    .leading()
                    .is_some_and(|leading| contains_ignore_case(leading, &row.matcher))
            })
        })
        .count();

    (column_hits + row_hits) as f64 / possible as f64
}

/// Picks the best scoring candidate. Ties go to the earliest candidate.
///
/// When no candidate scores above zero, `fallback` decides between the first candidate and
/// [TableFailure::NoCandidateMatched].
pub fn select_candidate(
    candidates: &[Grid],
    rows: &[RowDescriptor],
    columns: &[ColumnDescriptor],
    fallback: CandidateFallback,
) -> Result<Selection, TableFailure> {
    let mut best: Option<Selection> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = score_candidate(candidate, rows, columns);
        log::trace!("Candidate {index} scored {score:.2}.");
        if score > best.map_or(0.0, |best| best.score) {
            best = Some(Selection { index, score });
        }
    }

    match (best, fallback) {
        (Some(selection), _) => Ok(selection),
        (None, _) if candidates.is_empty() => Err(TableFailure::NoGridDetected),
        (None, CandidateFallback::FirstCandidate) => {
            log::debug!("No candidate matched the schema; falling back to the first.");
            Ok(Selection {
                index: 0,
                score: 0.0,
            })
        }
        (None, CandidateFallback::Reject) => Err(TableFailure::NoCandidateMatched),
    }
}
