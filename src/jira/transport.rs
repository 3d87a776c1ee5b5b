use crate::jira::TrackerError;
use serde::{Deserialize, Serialize};

/// Fields requested for every issue, matching the `Issue` projection.
pub const ISSUE_FIELDS: [&str; 7] = [
    "issuetype",
    "summary",
    "status",
    "created",
    "updated",
    "labels",
    "resolution",
];

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub jql: String,
    pub start_at: u32,
    pub max_results: u32,
    pub fields: Vec<String>,
}

impl SearchRequest {
    pub fn new(jql: impl ToString, start_at: u32, max_results: u32) -> Self {
        Self {
            jql: jql.to_string(),
            start_at,
            max_results,
            fields: ISSUE_FIELDS.iter().map(|field| field.to_string()).collect(),
        }
    }
}

/// One page of search results. The paging envelope is required; a page
/// without it cannot be continued safely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub start_at: u32,
    pub max_results: u32,
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIssue {
    pub id: Option<String>,
    #[serde(rename = "self")]
    pub url: Option<String>,
    pub key: String,
    pub fields: RawFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFields {
    pub issuetype: Option<Named>,
    pub summary: Option<String>,
    pub status: Option<Named>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub labels: Option<Vec<String>>,
    pub resolution: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawVersion {
    pub id: String,
    pub name: Option<String>,
    pub released: Option<bool>,
    pub start_date: Option<String>,
    pub release_date: Option<String>,
}

/// The calls the tracker has to answer. Authentication and HTTP live behind
/// this seam.
pub trait TrackerTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, TrackerError>;

    /// Fails with [`TrackerError::NotFound`] for an unknown key.
    async fn issue(&self, key: &str) -> Result<RawIssue, TrackerError>;

    /// Fails with [`TrackerError::NotFound`] for an unknown project.
    async fn project_versions(&self, project: &str) -> Result<Vec<RawVersion>, TrackerError>;
}
