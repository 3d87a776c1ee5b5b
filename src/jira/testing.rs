//! In-memory tracker used by the unit tests.

use crate::jira::transport::{
    Named, RawFields, RawIssue, RawVersion, SearchPage, SearchRequest, TrackerTransport,
};
use crate::jira::TrackerError;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeTransport {
    search_results: HashMap<String, Vec<RawIssue>>,
    failing_queries: HashMap<String, u16>,
    page_cap: Option<u32>,
    overstated_total: Option<u32>,
    search_failure_at: Option<u32>,
    page_rewrite: Option<fn(&mut SearchPage)>,
    issues: HashMap<String, RawIssue>,
    versions: HashMap<String, Vec<RawVersion>>,
    failing_projects: HashMap<String, u16>,
    search_requests: Mutex<Vec<SearchRequest>>,
    issue_requests: Mutex<Vec<String>>,
    version_requests: Mutex<Vec<String>>,
}

// Scripting
impl FakeTransport {
    pub fn with_search_results(mut self, jql: &str, issues: Vec<RawIssue>) -> Self {
        self.search_results.insert(jql.to_string(), issues);
        self
    }

    pub fn with_failing_query(mut self, jql: &str, status: u16) -> Self {
        self.failing_queries.insert(jql.to_string(), status);
        self
    }

    pub fn with_page_cap(mut self, cap: u32) -> Self {
        self.page_cap = Some(cap);
        self
    }

    pub fn with_overstated_total(mut self, total: u32) -> Self {
        self.overstated_total = Some(total);
        self
    }

    pub fn with_search_failure_at(mut self, start_at: u32) -> Self {
        self.search_failure_at = Some(start_at);
        self
    }

    /// Tampers with every page envelope before it is returned.
    pub fn with_page_rewrite(mut self, rewrite: fn(&mut SearchPage)) -> Self {
        self.page_rewrite = Some(rewrite);
        self
    }

    pub fn with_issues(mut self, issues: Vec<RawIssue>) -> Self {
        for issue in issues {
            self.issues.insert(issue.key.clone(), issue);
        }
        self
    }

    pub fn with_versions(mut self, project: &str, versions: Vec<RawVersion>) -> Self {
        self.versions.insert(project.to_string(), versions);
        self
    }

    pub fn with_failing_project(mut self, project: &str, status: u16) -> Self {
        self.failing_projects.insert(project.to_string(), status);
        self
    }
}

// Inspection
impl FakeTransport {
    pub fn search_requests(&self) -> Vec<SearchRequest> {
        self.search_requests.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.search_requests()
            .into_iter()
            .map(|request| request.jql)
            .collect()
    }

    pub fn issue_requests(&self) -> Vec<String> {
        self.issue_requests.lock().unwrap().clone()
    }

    pub fn version_requests(&self) -> Vec<String> {
        self.version_requests.lock().unwrap().clone()
    }
}

fn error_for(status: u16, subject: &str) -> TrackerError {
    match status {
        400 => TrackerError::Rejected {
            status,
            messages: vec![format!("rejected: {}", subject)],
        },
        404 => TrackerError::NotFound(subject.to_string()),
        _ => TrackerError::Status {
            status,
            body: format!("failed: {}", subject),
        },
    }
}

impl TrackerTransport for FakeTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, TrackerError> {
        self.search_requests.lock().unwrap().push(request.clone());
        if let Some(status) = self.failing_queries.get(&request.jql) {
            return Err(error_for(*status, &request.jql));
        }
        if self.search_failure_at == Some(request.start_at) {
            return Err(error_for(500, &request.jql));
        }

        let all = self
            .search_results
            .get(&request.jql)
            .cloned()
            .unwrap_or_default();
        let max_results = self
            .page_cap
            .map_or(request.max_results, |cap| cap.min(request.max_results));
        let issues = all
            .iter()
            .skip(request.start_at as usize)
            .take(max_results as usize)
            .cloned()
            .collect();
        let mut page = SearchPage {
            start_at: request.start_at,
            max_results,
            total: self.overstated_total.unwrap_or(all.len() as u32),
            issues,
        };
        if let Some(rewrite) = self.page_rewrite {
            rewrite(&mut page);
        }
        Ok(page)
    }

    async fn issue(&self, key: &str) -> Result<RawIssue, TrackerError> {
        self.issue_requests.lock().unwrap().push(key.to_string());
        self.issues
            .get(key)
            .cloned()
            .ok_or_else(|| error_for(404, key))
    }

    async fn project_versions(&self, project: &str) -> Result<Vec<RawVersion>, TrackerError> {
        self.version_requests.lock().unwrap().push(project.to_string());
        if let Some(status) = self.failing_projects.get(project) {
            return Err(error_for(*status, project));
        }
        self.versions
            .get(project)
            .cloned()
            .ok_or_else(|| error_for(404, project))
    }
}

pub fn raw_issue(
    key: &str,
    created: Option<&str>,
    updated: Option<&str>,
    resolution: Option<&str>,
) -> RawIssue {
    let named = |name: &str| Named {
        name: Some(name.to_string()),
    };
    RawIssue {
        id: None,
        url: None,
        key: key.to_string(),
        fields: RawFields {
            issuetype: Some(named("Task")),
            summary: Some(format!("Summary of {}", key)),
            status: Some(named("Done")),
            created: created.map(String::from),
            updated: updated.map(String::from),
            labels: Some(vec![]),
            resolution: resolution.map(named),
        },
    }
}

/// `count` issues keyed `<project>-1` upward, all inside a 2017/2018 window.
pub fn raw_issues(project: &str, count: usize) -> Vec<RawIssue> {
    (1..=count)
        .map(|number| {
            raw_issue(
                &format!("{}-{}", project, number),
                Some("2017-12-01T10:00:00.000+0000"),
                Some("2017-12-02T10:00:00.000+0000"),
                None,
            )
        })
        .collect()
}

pub fn raw_version(id: &str, start_date: Option<&str>, release_date: Option<&str>) -> RawVersion {
    RawVersion {
        id: id.to_string(),
        name: Some(format!("Release {}", id)),
        released: None,
        start_date: start_date.map(String::from),
        release_date: release_date.map(String::from),
    }
}
