use crate::detect::{DEFAULT_STRATEGIES, GridStrategy};

/// Default distance, in points, that a table region extends below its anchor.
pub const DEFAULT_REGION_MARGIN: f32 = 200.0;

/// What to do when no candidate grid matches any schema column name or row label.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum CandidateFallback {
    /// Take the first candidate anyway, leaving row alignment to report what is missing.
    #[default]
    FirstCandidate,
    /// Treat the table as not found.
    Reject,
}

/// Tunables for a document extraction run.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    /// Distance, in points, that a table region extends below its anchor.
    pub region_margin: f32,
    /// Grid detection strategies, in the order they are tried.
    pub strategies: Vec<GridStrategy>,
    pub candidate_fallback: CandidateFallback,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            region_margin: DEFAULT_REGION_MARGIN,
            strategies: DEFAULT_STRATEGIES.to_vec(),
            candidate_fallback: CandidateFallback::default(),
        }
    }
}
