//! Grid detection over a table region, trying an ordered table of strategies.

use crate::{Document, Grid, GridMethod, Page, Region, failure::TableFailure};

/// Named grid detection strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridStrategy {
    pub name: &'static str,
    pub method: GridMethod,
}

impl GridStrategy {
    pub const fn new(name: &'static str, method: GridMethod) -> Self {
        Self { name, method }
    }
}

impl From<GridMethod> for GridStrategy {
    fn from(method: GridMethod) -> Self {
        Self::new(method.into(), method)
    }
}

/// Strategies tried when none are configured: ruled lines, then text alignment for borderless
/// tables, then strict ruled lines.
pub const DEFAULT_STRATEGIES: &[GridStrategy] = &[
    GridStrategy::new("lines", GridMethod::RuledLines),
    GridStrategy::new("text", GridMethod::TextAlignment),
    GridStrategy::new("lines-strict", GridMethod::StrictRuledLines),
];

/// Candidate grids produced by the first successful strategy.
#[derive(Debug, PartialEq)]
pub struct Detection {
    pub strategy: &'static str,
    pub candidates: Vec<Grid>,
}

/// Detects candidate grids, short-circuiting on the first strategy that yields any non-blank
/// grid.
pub struct TableDetector<'a> {
    strategies: &'a [GridStrategy],
}

impl<'a> TableDetector<'a> {
    pub fn new(strategies: &'a [GridStrategy]) -> Self {
        Self { strategies }
    }

    /// Returns every non-blank candidate from the first strategy producing at least one.
    ///
    /// A strategy that errors counts as producing no candidates.
    pub fn detect<D>(
        &self,
        document: &D,
        page: &Page,
        region: &Region,
    ) -> Result<Detection, TableFailure>
    where
        D: Document + ?Sized,
    {
        for strategy in self.strategies {
            let grids = match document.extract_grids(page, region, strategy.method) {
                Ok(grids) => grids,
                Err(err) => {
                    log::warn!(
                        "Grid strategy {:?} failed on page {}: {err:#}",
                        strategy.name,
                        page.index
                    );
                    continue;
                }
            };

            let candidates: Vec<Grid> = grids.into_iter().filter(|grid| !grid.is_blank()).collect();
            if candidates.is_empty() {
                log::debug!("Grid strategy {:?} found no candidates.", strategy.name);
                continue;
            }

            log::debug!(
                "Grid strategy {:?} found {} candidate(s).",
                strategy.name,
                candidates.len()
            );
            return Ok(Detection {
                strategy: strategy.name,
                candidates,
            });
        }

        Err(TableFailure::NoGridDetected)
    }
}
