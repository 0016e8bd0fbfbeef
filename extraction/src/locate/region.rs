use crate::{
    Document, Page, Region,
    failure::{Stage, TableFailure},
};

/// Derives the region of `page` holding the table introduced by `anchor`.
///
/// The region spans the full page width, from the top of the anchor's first occurrence down to
/// `margin` points below its bottom, clamped to the page height.
pub fn locate_region<D>(
    document: &D,
    page: &Page,
    anchor: &str,
    margin: f32,
) -> Result<Region, TableFailure>
where
    D: Document + ?Sized,
{
    let found = document
        .search(page, anchor)
        .map_err(|err| TableFailure::internal(Stage::LocateRegion, format!("{err:#}")))?
        .ok_or(TableFailure::RegionNotFound)?;

    let region = Region {
        top: found.top,
        bottom: (found.bottom + margin).min(page.height),
        left: 0.0,
        right: page.width,
    };
    log::debug!(
        "Anchor {anchor:?} found on page {} at {found:?}; table region {region:?}.",
        page.index
    );
    Ok(region)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use googletest::prelude::*;

    use super::locate_region;
    use crate::{
        Page, Region,
        document::MockDocument,
        failure::{Stage, TableFailure},
    };

    fn page() -> Page {
        Page {
            index: 4,
            text: "表2：主动公开政府信息情况".into(),
            width: 595.0,
            height: 842.0,
        }
    }

    fn anchor_at(top: f32, bottom: f32) -> Region {
        Region {
            top,
            bottom,
            left: 90.0,
            right: 300.0,
        }
    }

    #[gtest]
    fn test_region_extends_below_anchor_across_page() {
        let mut document = MockDocument::new();
        document
            .expect_search()
            .withf(|page, needle| page.index == 4 && needle == "主动公开政府信息情况")
            .return_once(|_, _| Ok(Some(anchor_at(100.0, 112.0))));

        let region = locate_region(&document, &page(), "主动公开政府信息情况", 200.0);

        expect_that!(
            region,
            ok(eq(&Region {
                top: 100.0,
                bottom: 312.0,
                left: 0.0,
                right: 595.0,
            }))
        );
    }

    #[gtest]
    fn test_region_is_clamped_to_page_height() {
        let mut document = MockDocument::new();
        document
            .expect_search()
            .return_once(|_, _| Ok(Some(anchor_at(780.0, 792.0))));

        let region = locate_region(&document, &page(), "anchor", 200.0);

        expect_that!(
            region,
            ok(eq(&Region {
                top: 780.0,
                bottom: 842.0,
                left: 0.0,
                right: 595.0,
            }))
        );
    }

    #[gtest]
    fn test_missing_anchor() {
        let mut document = MockDocument::new();
        document.expect_search().return_once(|_, _| Ok(None));

        expect_that!(
            locate_region(&document, &page(), "absent", 200.0),
            err(eq(&TableFailure::RegionNotFound))
        );
    }

    #[gtest]
    fn test_search_error_is_internal_failure() {
        let mut document = MockDocument::new();
        document
            .expect_search()
            .return_once(|_, _| Err(anyhow!("text page unavailable")));

        expect_that!(
            locate_region(&document, &page(), "anchor", 200.0),
            err(eq(&TableFailure::Internal {
                stage: Stage::LocateRegion,
                message: "text page unavailable".into(),
            }))
        );
    }
}
