use crate::git::Commit;
use crate::jira::{Issue, Version};
use indexmap::IndexMap;

pub type RepoCommits = IndexMap<String, Vec<Commit>>;
pub type RepoIssues = IndexMap<String, Vec<Issue>>;
pub type VersionIssues = IndexMap<String, Vec<Issue>>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SkippedRepository {
    pub name: String,
    pub reason: String,
}

/// One run's joined dataset. Repositories that failed are absent from both
/// per-repository maps and listed in `skipped`.
#[derive(Debug, Clone, Default)]
pub struct CorrelationResult {
    pub per_repo_commits: RepoCommits,
    pub per_repo_linked_issues: RepoIssues,
    pub changed_issues: Vec<Issue>,
    pub versions_in_window: Vec<Version>,
    pub issues_per_version: VersionIssues,
    pub skipped: Vec<SkippedRepository>,
}
