use std::ops::{Deref, DerefMut};

/// One table-shaped interpretation of a page region, as raw cell text.
///
/// Rows may be ragged: a row shorter than the header simply has no cells for the trailing
/// columns.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Grid(pub Vec<GridRow>);

impl Grid {
    /// Assumed header row, if any.
    pub fn header(&self) -> Option<&GridRow> {
        self.0.first()
    }

    /// Rows following the header, paired with their index within the grid.
    pub fn body(&self) -> impl Iterator<Item = (usize, &GridRow)> {
        self.0.iter().enumerate().skip(1)
    }

    /// Returns `true` if no cell in the grid holds any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(GridRow::is_blank)
    }

    /// Returns `true` if every row has exactly as many cells as the header.
    pub fn is_rectangular(&self) -> bool {
        match self.header() {
            Some(header) => self.0.iter().all(|row| row.len() == header.len()),
            None => true,
        }
    }
}

impl Deref for Grid {
    type Target = Vec<GridRow>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Grid {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<C, R> From<C> for Grid
where
    C: IntoIterator<Item = R>,
    R: Into<GridRow>,
{
    fn from(value: C) -> Self {
        Grid(value.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GridRow(pub Vec<String>);

impl GridRow {
    /// Leading cell, conventionally holding the row label.
    pub fn leading(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Cell at `index`, or an empty string when the row is too short.
    pub fn cell_or_empty(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|cell| cell.trim().is_empty())
    }
}

impl Deref for GridRow {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for GridRow {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<C, S> From<C> for GridRow
where
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from(value: C) -> Self {
        GridRow(value.into_iter().map(Into::into).collect())
    }
}
