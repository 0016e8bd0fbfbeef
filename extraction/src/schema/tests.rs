use std::io::Write;

use googletest::prelude::*;

use super::{ColumnDescriptor, ColumnType, RowDescriptor, Schema, SchemaError, TableDef};

const ACTIVE_DISCLOSURE_SCHEMA: &str = r#"{
    "locateKeywords": ["表2：主动公开政府信息情况", "主动公开"],
    "tables": [
        { "id": "active_disclosure", "section": "二", "locateKeyword": "主动公开政府信息情况" }
    ],
    "rows": [
        { "key": "rules", "label": "规章", "match": "规章" },
        { "key": "normative", "label": "行政规范性文件", "match": "规范性文件" }
    ],
    "columns": [
        { "key": "category", "name": "信息内容", "type": "string" },
        { "key": "issued", "name": "本年制发件数", "type": "number" }
    ]
}"#;

#[gtest]
fn test_parses_complete_schema() -> Result<()> {
    let schema = Schema::from_json(ACTIVE_DISCLOSURE_SCHEMA)?;

    expect_that!(
        schema.locate_keywords,
        eq(&vec![
            "表2：主动公开政府信息情况".to_string(),
            "主动公开".to_string()
        ])
    );
    expect_that!(
        schema.tables,
        eq(&vec![TableDef {
            id: "active_disclosure".into(),
            section: "二".into(),
            anchor: "主动公开政府信息情况".into(),
        }])
    );
    expect_that!(
        schema.rows[1],
        eq(&RowDescriptor {
            key: "normative".into(),
            label: "行政规范性文件".into(),
            matcher: "规范性文件".into(),
        })
    );
    expect_that!(
        schema.columns[1],
        eq(&ColumnDescriptor {
            key: "issued".into(),
            name: "本年制发件数".into(),
            column_type: ColumnType::Number,
        })
    );
    Ok(())
}

#[gtest]
fn test_fills_defaults_for_optional_fields() -> Result<()> {
    // GIVEN: descriptors with their optional fields omitted.
    let json = r#"{
        "tables": [ { "id": "t1", "locateKeyword": "anchor" } ],
        "rows": [ { "label": "Rules" } ],
        "columns": [ { "name": "Issued" } ]
    }"#;

    // WHEN: the schema is parsed.
    let schema = Schema::from_json(json)?;

    // THEN: defaults are applied at construction.
    expect_that!(schema.locate_keywords, is_empty());
    expect_that!(schema.tables[0].section, eq(""));
    expect_that!(
        schema.rows,
        eq(&vec![RowDescriptor {
            key: "row_0".into(),
            label: "Rules".into(),
            matcher: "Rules".into(),
        }])
    );
    expect_that!(
        schema.columns,
        eq(&vec![ColumnDescriptor {
            key: "col_0".into(),
            name: "Issued".into(),
            column_type: ColumnType::String,
        }])
    );
    Ok(())
}

#[gtest]
fn test_rejects_table_without_anchor() {
    let json = r#"{ "tables": [ { "id": "t1" } ] }"#;

    expect_that!(
        Schema::from_json(json),
        err(displays_as(contains_substring("has no locateKeyword")))
    );
}

#[gtest]
fn test_rejects_table_without_id() {
    let json = r#"{ "tables": [ { "locateKeyword": "anchor" } ] }"#;

    expect_that!(
        Schema::from_json(json),
        err(displays_as(contains_substring("table #0 has no id")))
    );
}

#[gtest]
fn test_rejects_row_without_match_or_label() {
    let json = r#"{ "rows": [ { "key": "r1" } ] }"#;

    expect_that!(
        Schema::from_json(json),
        err(displays_as(contains_substring(
            "row \"r1\" has neither a match nor a label"
        )))
    );
}

#[gtest]
fn test_rejects_duplicate_keys() {
    let rows = r#"{ "rows": [ { "key": "a", "match": "x" }, { "key": "a", "match": "y" } ] }"#;
    let columns = r#"{ "columns": [ { "key": "c" }, { "key": "c" } ] }"#;

    expect_that!(
        Schema::from_json(rows),
        err(displays_as(contains_substring("duplicate row key \"a\"")))
    );
    expect_that!(
        Schema::from_json(columns),
        err(displays_as(contains_substring("duplicate column key \"c\"")))
    );
}

#[gtest]
fn test_rejects_colliding_cell_keys() {
    // GIVEN: distinct row and column keys whose joined cell keys coincide ("a_b_c").
    let json = r#"{
        "rows": [ { "key": "a", "match": "甲" }, { "key": "a_b", "match": "乙" } ],
        "columns": [ { "key": "b_c", "name": "x" }, { "key": "c", "name": "y" } ]
    }"#;

    expect_that!(
        Schema::from_json(json),
        err(displays_as(contains_substring("duplicate cell key \"a_b_c\"")))
    );
}

#[gtest]
fn test_accepts_distinct_cell_keys() -> Result<()> {
    let json = r#"{
        "rows": [ { "key": "a", "match": "甲" }, { "key": "a_b", "match": "乙" } ],
        "columns": [ { "key": "x", "name": "x" }, { "key": "y", "name": "y" } ]
    }"#;

    expect_that!(Schema::from_json(json)?.rows.len(), eq(2));
    Ok(())
}

#[gtest]
fn test_rejects_empty_locate_keyword() {
    let json = r#"{ "locateKeywords": ["表2", ""] }"#;

    expect_that!(
        Schema::from_json(json),
        err(displays_as(contains_substring("locateKeywords[1] is empty")))
    );
}

#[gtest]
fn test_rejects_unknown_column_type() {
    let json = r#"{ "columns": [ { "key": "c", "type": "date" } ] }"#;

    expect_that!(
        Schema::from_json(json),
        err(predicate(|err: &SchemaError| matches!(err, SchemaError::Parse(_))))
    );
}

#[gtest]
fn test_load_reads_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(ACTIVE_DISCLOSURE_SCHEMA.as_bytes())?;

    let schema = Schema::load(file.path())?;

    expect_that!(schema.tables.len(), eq(1));
    expect_that!(schema.rows.len(), eq(2));
    Ok(())
}

#[gtest]
fn test_load_reports_missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let result = Schema::load(&dir.path().join("missing.json"));

    expect_that!(
        result,
        err(predicate(|err: &SchemaError| matches!(err, SchemaError::Io(_))))
    );
    Ok(())
}

#[gtest]
fn test_load_reports_malformed_json() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"{ \"tables\": [")?;

    expect_that!(
        Schema::load(file.path()),
        err(displays_as(starts_with("parsing schema JSON")))
    );
    Ok(())
}
