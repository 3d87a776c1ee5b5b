use crate::correlate::model::VersionIssues;
use crate::correlate::{CorrelationResult, IssueKeyExtractor, SkippedRepository};
use crate::git::{Commit, CommitLogReader, LogRequest};
use crate::jira::{
    query, version, Issue, RetrievalError, TrackerSearchClient, TrackerTransport,
    TrackerVersionClient, Version,
};
use crate::model::{Repository, Result, Settings};
use crate::utils::RateLimiter;
use tracing::{debug, error, info, warn};

pub type RepoProgress<'a> = Box<dyn FnMut(&Repository) + 'a>;

/// Drives one run: the project-wide issue and version phases first, then each
/// repository in turn. All tracker calls share one limiter.
pub struct CorrelationPipeline<'a, T, R> {
    settings: &'a Settings,
    search: TrackerSearchClient<'a, T>,
    versions: TrackerVersionClient<'a, T>,
    log_reader: &'a R,
    extractor: &'a IssueKeyExtractor,
}

impl<'a, T: TrackerTransport, R: CommitLogReader> CorrelationPipeline<'a, T, R> {
    pub fn new(
        settings: &'a Settings,
        transport: &'a T,
        limiter: &'a RateLimiter,
        log_reader: &'a R,
        extractor: &'a IssueKeyExtractor,
    ) -> Self {
        Self {
            settings,
            search: TrackerSearchClient::new(transport, limiter, settings.tracker.page_size),
            versions: TrackerVersionClient::new(transport, limiter),
            log_reader,
            extractor,
        }
    }

    /// Fails only when a project-wide phase fails. A repository that cannot
    /// be correlated is logged, recorded in `skipped` and left out.
    pub async fn run(&self, mut progress: RepoProgress<'_>) -> Result<CorrelationResult> {
        let changed_issues = self.changed_issues().await?;
        let (versions_in_window, issues_per_version) = self.versions_in_window().await?;

        let mut result = CorrelationResult {
            changed_issues,
            versions_in_window,
            issues_per_version,
            ..Default::default()
        };

        for repo in &self.settings.repositories {
            match self.correlate_repository(repo).await {
                Ok((commits, issues)) => {
                    result.per_repo_commits.insert(repo.name.clone(), commits);
                    result.per_repo_linked_issues.insert(repo.name.clone(), issues);
                }
                Err(err) => {
                    error!(
                        repository = %repo.name,
                        path = %repo.path.display(),
                        error = %err,
                        "Skipping repository"
                    );
                    result.skipped.push(SkippedRepository {
                        name: repo.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
            progress(repo);
        }
        Ok(result)
    }

    async fn changed_issues(&self) -> Result<Vec<Issue>> {
        let tracker = &self.settings.tracker;
        let window = &self.settings.window;
        let jql = query::changed_issues(&tracker.project, window, &tracker.excluded_resolution);
        let issues = self.search.search(&jql).await?;

        let fetched = issues.len();
        let issues: Vec<_> = issues
            .into_iter()
            .filter(|issue| {
                window.contains_opt(issue.created_date.as_deref())
                    || window.contains_opt(issue.updated_date.as_deref())
            })
            .filter(|issue| {
                issue.resolution.as_deref() != Some(tracker.excluded_resolution.as_str())
            })
            .collect();
        if issues.len() < fetched {
            debug!(
                dropped = fetched - issues.len(),
                "Dropped changed issues outside the window or resolution filter"
            );
        }
        info!(project = %tracker.project, issues = issues.len(), "Fetched changed issues");
        Ok(issues)
    }

    async fn versions_in_window(&self) -> Result<(Vec<Version>, VersionIssues)> {
        let project = &self.settings.tracker.project;
        let versions = self.versions.list_versions(project).await?;
        let listed = versions.len();
        let versions = version::filter_in_window(versions, &self.settings.window);
        info!(project = %project, listed, in_window = versions.len(), "Fetched versions");

        let mut issues_per_version = VersionIssues::new();
        for version in &versions {
            let issues = self.search.search(&query::fix_version(&version.id)).await?;
            debug!(
                version = %version.id,
                issues = issues.len(),
                "Fetched issues fixed in version"
            );
            issues_per_version.insert(version.id.clone(), issues);
        }
        Ok((versions, issues_per_version))
    }

    async fn correlate_repository(&self, repo: &Repository) -> Result<(Vec<Commit>, Vec<Issue>)> {
        let request = LogRequest::new(
            &repo.path,
            &self.settings.window,
            self.settings.commit_limit,
            self.settings.all_branches,
        );
        let commits = self.log_reader.read_log(&request).await?;
        let keys = self.extractor.extract(&commits);
        info!(
            repository = %repo.name,
            commits = commits.len(),
            keys = keys.len(),
            "Read commit history"
        );

        let issues = self.linked_issues(&repo.name, &keys).await?;
        Ok((commits, issues))
    }

    async fn linked_issues(
        &self,
        repository: &str,
        keys: &[String],
    ) -> std::result::Result<Vec<Issue>, RetrievalError> {
        let Some(jql) = query::keys(keys) else {
            debug!(repository, "No issue keys referenced");
            return Ok(vec![]);
        };
        match self.search.search(&jql).await {
            Ok(issues) => Ok(issues),
            Err(err) if err.source_error().is_rejected() => {
                warn!(
                    repository,
                    error = %err,
                    "Batched key query rejected, looking issues up one by one"
                );
                let mut issues = Vec::with_capacity(keys.len());
                for key in keys {
                    if let Some(issue) = self.search.find_issue(key).await? {
                        issues.push(issue);
                    }
                }
                Ok(issues)
            }
            Err(err) => Err(err),
        }
    }
}
