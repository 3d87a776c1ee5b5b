use crate::jira::transport::RawVersion;
use crate::jira::{RetrievalError, TrackerTransport};
use crate::model::ReportWindow;
use crate::utils::RateLimiter;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub start_date: Option<String>,
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,
}

impl Version {
    pub fn overlaps(&self, window: &ReportWindow) -> bool {
        window.contains_opt(self.start_date.as_deref())
            || window.contains_opt(self.release_date.as_deref())
    }
}

impl From<RawVersion> for Version {
    fn from(raw: RawVersion) -> Self {
        Self {
            id: raw.id,
            start_date: raw.start_date,
            release_date: raw.release_date,
            name: raw.name,
            released: raw.released,
        }
    }
}

pub struct TrackerVersionClient<'a, T> {
    transport: &'a T,
    limiter: &'a RateLimiter,
}

impl<'a, T: TrackerTransport> TrackerVersionClient<'a, T> {
    pub fn new(transport: &'a T, limiter: &'a RateLimiter) -> Self {
        Self { transport, limiter }
    }

    /// All versions of `project`. A project the tracker does not know has
    /// no versions.
    pub async fn list_versions(&self, project: &str) -> Result<Vec<Version>, RetrievalError> {
        match self
            .limiter
            .schedule(|| self.transport.project_versions(project))
            .await
        {
            Ok(versions) => Ok(versions.into_iter().map(Version::from).collect()),
            Err(err) if err.is_not_found() => {
                info!(project, "Project id is invalid, continuing");
                Ok(vec![])
            }
            Err(source) => Err(RetrievalError::Versions {
                project: project.to_string(),
                source,
            }),
        }
    }
}

pub fn filter_in_window(versions: Vec<Version>, window: &ReportWindow) -> Vec<Version> {
    versions
        .into_iter()
        .filter(|version| version.overlaps(window))
        .collect()
}
