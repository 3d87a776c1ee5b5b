use thiserror::Error;

/// Failure of one call to the tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query rejected ({status}): {}", messages.join("; "))]
    Rejected { status: u16, messages: Vec<String> },

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Search page at {start_at} reported maxResults {max_results} and cannot advance")]
    Stalled { start_at: u32, max_results: u32 },
}

impl TrackerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// A retrieval that failed as a whole, with the input needed to re-run it.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Search `{query}` failed: {source}")]
    Search { query: String, source: TrackerError },

    #[error("Lookup of issue {key} failed: {source}")]
    Issue { key: String, source: TrackerError },

    #[error("Listing versions of project {project} failed: {source}")]
    Versions {
        project: String,
        source: TrackerError,
    },
}

impl RetrievalError {
    pub fn source_error(&self) -> &TrackerError {
        match self {
            Self::Search { source, .. }
            | Self::Issue { source, .. }
            | Self::Versions { source, .. } => source,
        }
    }
}
