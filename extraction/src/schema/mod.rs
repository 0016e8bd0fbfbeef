//! Declarative description of the tables to extract, loaded and validated once per run.
//!
//! Optional fields receive their defaults here, so that the rest of the pipeline can rely on
//! every descriptor being complete.

#[cfg(test)]
mod tests;

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::align::cell_key;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("reading schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing schema JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// Validated extraction schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    /// Fragments whose presence on a page is evidence that it holds the target section.
    pub locate_keywords: Vec<String>,
    pub tables: Vec<TableDef>,
    /// Rows expected in every table, in output order.
    pub rows: Vec<RowDescriptor>,
    /// Columns expected in every table, in output order.
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableDef {
    pub id: String,
    pub section: String,
    /// Fragment whose bounds on the located page seed the table's region.
    pub anchor: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowDescriptor {
    pub key: String,
    pub label: String,
    /// Substring searched for in the leading cell of body rows.
    pub matcher: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
}

impl Schema {
    /// Reads and validates a schema from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let file = std::fs::File::open(path)?;
        let raw: RawSchema = serde_json::from_reader(std::io::BufReader::new(file))?;
        let schema = Self::try_from(raw)?;
        log::debug!(
            "Loaded schema from {:?}: {} table(s), {} row(s), {} column(s).",
            path,
            schema.tables.len(),
            schema.rows.len(),
            schema.columns.len(),
        );
        Ok(schema)
    }

    /// Parses and validates a schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: RawSchema = serde_json::from_str(json)?;
        Self::try_from(raw)
    }
}

/// Schema as it appears on disk, before defaults and validation.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default)]
    locate_keywords: Vec<String>,
    #[serde(default)]
    tables: Vec<RawTableDef>,
    #[serde(default)]
    rows: Vec<RawRowDescriptor>,
    #[serde(default)]
    columns: Vec<RawColumnDescriptor>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawTableDef {
    id: Option<String>,
    section: Option<String>,
    locate_keyword: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawRowDescriptor {
    key: Option<String>,
    label: Option<String>,
    #[serde(rename = "match")]
    matcher: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawColumnDescriptor {
    key: Option<String>,
    name: Option<String>,
    #[serde(rename = "type", default)]
    column_type: ColumnType,
}

impl TryFrom<RawSchema> for Schema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let tables = raw
            .tables
            .into_iter()
            .enumerate()
            .map(|(index, table)| TableDef::try_from_raw(index, table))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = raw
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| RowDescriptor::try_from_raw(index, row))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique_keys("row", rows.iter().map(|row| row.key.as_str()))?;

        let columns: Vec<_> = raw
            .columns
            .into_iter()
            .enumerate()
            .map(|(index, column)| ColumnDescriptor::from_raw(index, column))
            .collect();
        ensure_unique_keys("column", columns.iter().map(|column| column.key.as_str()))?;
        ensure_unique_keys(
            "cell",
            rows.iter()
                .flat_map(|row| columns.iter().map(move |column| cell_key(&row.key, &column.key))),
        )?;

        if let Some(index) = raw.locate_keywords.iter().position(String::is_empty) {
            return Err(SchemaError::Invalid(format!("locateKeywords[{index}] is empty")));
        }

        Ok(Schema {
            locate_keywords: raw.locate_keywords,
            tables,
            rows,
            columns,
        })
    }
}

impl TableDef {
    fn try_from_raw(index: usize, raw: RawTableDef) -> Result<Self, SchemaError> {
        let id = non_empty(raw.id)
            .ok_or_else(|| SchemaError::Invalid(format!("table #{index} has no id")))?;
        let anchor = non_empty(raw.locate_keyword).ok_or_else(|| {
            SchemaError::Invalid(format!("table {id:?} has no locateKeyword"))
        })?;
        Ok(Self {
            id,
            section: raw.section.unwrap_or_default(),
            anchor,
        })
    }
}

impl RowDescriptor {
    fn try_from_raw(index: usize, raw: RawRowDescriptor) -> Result<Self, SchemaError> {
        let key = non_empty(raw.key).unwrap_or_else(|| format!("row_{index}"));
        let label = raw.label.unwrap_or_default();
        let matcher = non_empty(raw.matcher)
            .or_else(|| Some(label.clone()).filter(|label| !label.is_empty()))
            .ok_or_else(|| {
                SchemaError::Invalid(format!("row {key:?} has neither a match nor a label"))
            })?;
        Ok(Self {
            key,
            label,
            matcher,
        })
    }
}

impl ColumnDescriptor {
    fn from_raw(index: usize, raw: RawColumnDescriptor) -> Self {
        Self {
            key: non_empty(raw.key).unwrap_or_else(|| format!("col_{index}")),
            name: raw.name.unwrap_or_default(),
            column_type: raw.column_type,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn ensure_unique_keys<K: AsRef<str>>(
    kind: &str,
    keys: impl IntoIterator<Item = K>,
) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for key in keys {
        let key = key.as_ref();
        if !seen.insert(key.to_owned()) {
            return Err(SchemaError::Invalid(format!("duplicate {kind} key {key:?}")));
        }
    }
    Ok(())
}
