use anyhow::anyhow;
use googletest::prelude::*;

use super::Extractor;
use crate::{
    CandidateFallback, ExtractOptions, Grid, GridMethod, Region,
    metrics::Completeness,
    result::DocumentMetrics,
    schema::TableDef,
    testutil::{FakeDocument, disclosure_schema},
};

const HEADING: &str = "表2：主动公开政府信息情况";
const ANCHOR: &str = "主动公开政府信息情况";
const TARGET_PAGE: usize = 5;

fn anchor_bounds() -> Region {
    Region {
        top: 120.0,
        bottom: 134.0,
        left: 90.0,
        right: 400.0,
    }
}

fn disclosure_grid() -> Grid {
    Grid::from([
        vec!["信息内容", "本年新制发件数"],
        vec!["规章", "0"],
        vec!["规范性文件", "12"],
        vec!["行政许可", "1,024"],
    ])
}

/// Seven page report whose sixth page holds the disclosure table.
fn report() -> FakeDocument {
    let target_text = format!("二、主动公开政府信息情况\n{HEADING}\n信息内容 本年新制发件数");
    FakeDocument::with_pages([
        "2023年政府信息公开工作年度报告",
        "一、总体情况",
        "主动公开",
        "（一）主动公开",
        "（二）依申请公开",
        target_text.as_str(),
        "三、收到和处理政府信息公开申请情况",
    ])
    .search_hit(TARGET_PAGE, ANCHOR, anchor_bounds())
}

#[gtest]
#[test_log::test]
fn test_extracts_borderless_table_from_located_page() {
    // GIVEN: a report whose table has no ruling lines.
    let document = report().grids(TARGET_PAGE, GridMethod::TextAlignment, vec![disclosure_grid()]);
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    // WHEN
    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    // THEN: the table is recovered from the located page via text alignment.
    expect_that!(aggregate.page, some(eq(TARGET_PAGE)));
    expect_that!(
        aggregate.metrics,
        eq(&DocumentMetrics {
            total_pages: 7,
            pages_searched: 7,
            tables_found: 1,
        })
    );
    expect_that!(aggregate.issues, is_empty());
    assert_that!(aggregate.tables, len(eq(1)));

    let table = &aggregate.tables[0];
    expect_that!(table.metrics.matched_rows, eq(3));
    expect_that!(table.metrics.row_match_rate, eq(1.0));
    expect_that!(table.metrics.non_empty_ratio, ge(0.83));
    expect_that!(table.metrics.numeric_parse_rate, eq(0.5));
    expect_that!(table.confidence, eq(0.9));
    expect_that!(table.completeness, eq(Completeness::Complete));
    expect_that!(table.cells.get("permits_count"), some(eq("1,024")));
    expect_that!(table.issues, is_empty());
}

#[gtest]
#[test_log::test]
fn test_falls_through_failing_ruled_line_detection() {
    let document = report()
        .grids_fail(TARGET_PAGE, GridMethod::RuledLines, "no ruling lines")
        .grids(TARGET_PAGE, GridMethod::TextAlignment, vec![disclosure_grid()]);
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    assert_that!(aggregate.tables, len(eq(1)));
    expect_that!(aggregate.tables[0].metrics.matched_rows, eq(3));
    expect_that!(aggregate.tables[0].issues, is_empty());
}

#[gtest]
fn test_prefers_best_scoring_candidate() {
    let unrelated = Grid::from([vec!["序号", "备注"], vec!["1", "见附件"]]);
    let document = report().grids(
        TARGET_PAGE,
        GridMethod::RuledLines,
        vec![unrelated, disclosure_grid()],
    );
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    assert_that!(aggregate.tables, len(eq(1)));
    expect_that!(aggregate.tables[0].aligned_rows[0].source_row, some(eq(1)));
    expect_that!(
        aggregate.tables[0].cells.get("normative_count"),
        some(eq("12"))
    );
}

#[gtest]
fn test_missing_anchor_yields_empty_table() {
    // GIVEN: the anchor cannot be found on the located page.
    let document = FakeDocument::with_pages(["cover", HEADING]);
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    // THEN: the table is still reported, with nothing extracted.
    expect_that!(aggregate.page, some(eq(1)));
    expect_that!(aggregate.metrics.tables_found, eq(1));
    assert_that!(aggregate.tables, len(eq(1)));
    let table = &aggregate.tables[0];
    expect_that!(table.issues, eq(&vec!["table_not_found".to_string()]));
    expect_that!(table.cells, is_empty());
    expect_that!(table.rows, is_empty());
    expect_that!(table.confidence, eq(0.0));
    expect_that!(table.metrics.expected_rows, eq(3));
    expect_that!(table.completeness, eq(Completeness::Failed));
}

#[gtest]
fn test_no_grid_detected() {
    let document = report();
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    assert_that!(aggregate.tables, len(eq(1)));
    expect_that!(
        aggregate.tables[0].issues,
        eq(&vec!["no_text".to_string()])
    );
}

#[gtest]
fn test_rejects_unscored_candidates_when_configured() {
    let unrelated = Grid::from([vec!["序号", "备注"], vec!["1", "见附件"]]);
    let schema = disclosure_schema();
    let options = ExtractOptions {
        candidate_fallback: CandidateFallback::Reject,
        ..Default::default()
    };

    let rejected = Extractor::new(&schema, &options).extract_document(|| {
        Ok(report().grids(TARGET_PAGE, GridMethod::RuledLines, vec![unrelated.clone()]))
    });
    let accepted = Extractor::new(&schema, &ExtractOptions::default()).extract_document(|| {
        Ok(report().grids(TARGET_PAGE, GridMethod::RuledLines, vec![unrelated.clone()]))
    });

    expect_that!(
        rejected.tables[0].issues,
        eq(&vec!["no_candidate_matched".to_string()])
    );
    expect_that!(
        accepted.tables[0].issues,
        eq(&vec![
            "row_not_matched:rules".to_string(),
            "row_not_matched:normative".to_string(),
            "row_not_matched:permits".to_string(),
        ])
    );
}

#[gtest]
fn test_page_not_found() {
    let document = FakeDocument::with_pages(["cover", "contents", "appendix"]);
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    expect_that!(aggregate.tables, is_empty());
    expect_that!(aggregate.issues, eq(&vec!["page_not_found".to_string()]));
    expect_that!(aggregate.page, none());
    expect_that!(
        aggregate.metrics,
        eq(&DocumentMetrics {
            total_pages: 3,
            pages_searched: 0,
            tables_found: 0,
        })
    );
}

#[gtest]
fn test_no_locate_keywords() {
    let document = report();
    let mut schema = disclosure_schema();
    schema.locate_keywords.clear();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    expect_that!(aggregate.tables, is_empty());
    expect_that!(
        aggregate.issues,
        eq(&vec![
            "no_locate_keywords".to_string(),
            "page_not_found".to_string()
        ])
    );
}

#[gtest]
fn test_open_failure_is_recorded() {
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options)
        .extract_document(|| Err::<FakeDocument, _>(anyhow!("not a PDF file")));

    expect_that!(aggregate.tables, is_empty());
    expect_that!(
        aggregate.issues,
        eq(&vec!["document_open_failed:not a PDF file".to_string()])
    );
    expect_that!(aggregate.metrics.total_pages, eq(0));
}

#[gtest]
#[test_log::test]
fn test_unreadable_pages_are_never_chosen() {
    // GIVEN: the heading appears on two pages, but the earlier one cannot be read.
    let document = FakeDocument::with_pages(["cover", HEADING, HEADING])
        .page_fails(1, "corrupt content stream")
        .search_hit(2, ANCHOR, anchor_bounds())
        .grids(2, GridMethod::RuledLines, vec![disclosure_grid()]);
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    expect_that!(aggregate.page, some(eq(2)));
    expect_that!(aggregate.metrics.total_pages, eq(3));
    expect_that!(aggregate.tables[0].metrics.matched_rows, eq(3));
}

#[gtest]
fn test_panicking_table_does_not_stop_later_tables() {
    // GIVEN: two tables, the first of which panics while searching for its anchor.
    let mut schema = disclosure_schema();
    schema.tables.insert(
        0,
        TableDef {
            id: "broken".into(),
            section: "一".into(),
            anchor: "总体情况".into(),
        },
    );
    let document = report()
        .search_panics(TARGET_PAGE, "总体情况", "text page was freed")
        .grids(TARGET_PAGE, GridMethod::RuledLines, vec![disclosure_grid()]);
    let drops = document.drop_counter();
    let options = ExtractOptions::default();

    // WHEN
    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    // THEN: the panic is confined to the first table, and the document is released once.
    expect_that!(aggregate.metrics.tables_found, eq(2));
    expect_that!(
        aggregate.tables[0].issues,
        eq(&vec![
            "internal_error:extract_table:text page was freed".to_string()
        ])
    );
    expect_that!(aggregate.tables[1].id, eq("active_disclosure"));
    expect_that!(aggregate.tables[1].metrics.matched_rows, eq(3));
    expect_that!(drops.get(), eq(1));
}

#[gtest]
fn test_search_error_becomes_internal_issue() {
    let document = report().search_fails(TARGET_PAGE, ANCHOR, "text page unavailable");
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    expect_that!(
        aggregate.tables[0].issues,
        eq(&vec![
            "internal_error:locate_region:text page unavailable".to_string()
        ])
    );
}

#[gtest]
fn test_document_is_dropped_once() {
    let document = report();
    let drops = document.drop_counter();
    let schema = disclosure_schema();
    let options = ExtractOptions::default();

    let _aggregate = Extractor::new(&schema, &options).extract_document(|| Ok(document));

    expect_that!(drops.get(), eq(1));
}

#[gtest]
fn test_output_is_deterministic() -> googletest::Result<()> {
    let schema = disclosure_schema();
    let options = ExtractOptions::default();
    let extractor = Extractor::new(&schema, &options);
    let run = || {
        extractor.extract_document(|| {
            Ok(report().grids(TARGET_PAGE, GridMethod::TextAlignment, vec![disclosure_grid()]))
        })
    };

    let first = serde_json::to_string_pretty(&run())?;
    let second = serde_json::to_string_pretty(&run())?;

    expect_that!(first, eq(&second));
    Ok(())
}
