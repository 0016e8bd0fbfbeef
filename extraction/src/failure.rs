//! Tagged failure reasons for each level of the pipeline, and the issue codes they are reported
//! as in the extraction result.

/// Reasons that no table extraction is attempted for a document.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DocumentFailure {
    #[error("failed to open document: {0}")]
    OpenFailed(String),
    #[error("no locate keywords configured")]
    NoLocateKeywords,
    #[error("no page contains any locate keyword")]
    PageNotFound,
}

impl DocumentFailure {
    /// Document-level issue codes describing the failure.
    pub fn issue_codes(&self) -> Vec<String> {
        use DocumentFailure::*;
        match self {
            OpenFailed(message) => vec![format!("document_open_failed:{message}")],
            NoLocateKeywords => vec!["no_locate_keywords".into(), "page_not_found".into()],
            PageNotFound => vec!["page_not_found".into()],
        }
    }
}

/// Pipeline stage, used to attribute unexpected failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    LocateRegion,
    DetectGrid,
    ExtractTable,
}

/// Reasons that a single table yields no aligned data.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TableFailure {
    #[error("anchor keyword not found on the located page")]
    RegionNotFound,
    #[error("no grid detected in the table region")]
    NoGridDetected,
    #[error("no candidate grid matched any schema header or row label")]
    NoCandidateMatched,
    #[error("internal error during {stage}: {message}")]
    Internal { stage: Stage, message: String },
}

impl TableFailure {
    pub fn internal(stage: Stage, err: impl std::fmt::Display) -> Self {
        Self::Internal {
            stage,
            message: err.to_string(),
        }
    }

    /// Table-level issue code describing the failure.
    pub fn issue_code(&self) -> String {
        use TableFailure::*;
        match self {
            RegionNotFound => "table_not_found".into(),
            NoGridDetected => "no_text".into(),
            NoCandidateMatched => "no_candidate_matched".into(),
            Internal { stage, message } => format!("internal_error:{stage}:{message}"),
        }
    }
}

/// Row-level issue code for a schema row that matched no body row.
pub fn row_not_matched(row_key: &str) -> String {
    format!("row_not_matched:{row_key}")
}
