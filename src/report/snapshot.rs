use crate::correlate::CorrelationResult;
use crate::model::{Error, Result};
use futures::future;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

const COMMITS_DIR: &str = "commits";
const TRACKER_DIR: &str = "jira_data";

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

/// Writes a run's datasets as pretty JSON files under one root directory.
/// Each run replaces the snapshot of the previous one.
pub struct SnapshotWriter {
    root: PathBuf,
}

impl SnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recreates the dataset directories empty, dropping whatever an earlier
    /// run left in them. Nothing else under the root is touched.
    pub async fn ensure_layout(&self) -> Result<()> {
        for dir in [COMMITS_DIR, TRACKER_DIR] {
            let path = self.root.join(dir);
            match fs::remove_dir_all(&path).await {
                Ok(()) => debug!(path = %path.display(), "Cleared previous snapshot"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(Error::io(&path, err)),
            }
            fs::create_dir_all(&path)
                .await
                .map_err(|err| Error::io(&path, err))?;
        }
        Ok(())
    }

    pub fn commits_path(&self, repository: &str) -> PathBuf {
        self.root
            .join(COMMITS_DIR)
            .join(format!("commits_{}.json", repository))
    }

    pub fn issues_path(&self, repository: &str) -> PathBuf {
        self.root
            .join(TRACKER_DIR)
            .join(format!("issues_{}.json", repository))
    }

    pub fn changed_issues_path(&self) -> PathBuf {
        self.root.join(TRACKER_DIR).join("changed_issues.json")
    }

    pub fn versions_path(&self) -> PathBuf {
        self.root.join(TRACKER_DIR).join("versions.json")
    }

    pub fn issues_per_version_path(&self) -> PathBuf {
        self.root.join(TRACKER_DIR).join("issues_per_version.json")
    }

    /// Writes every dataset independently; a failed one is logged and
    /// counted without holding back the rest.
    pub async fn write_all(&self, result: &CorrelationResult) -> WriteSummary {
        let mut datasets = Vec::new();
        for (repository, commits) in &result.per_repo_commits {
            datasets.push((self.commits_path(repository), to_json(commits)));
        }
        for (repository, issues) in &result.per_repo_linked_issues {
            datasets.push((self.issues_path(repository), to_json(issues)));
        }
        datasets.push((self.changed_issues_path(), to_json(&result.changed_issues)));
        datasets.push((self.versions_path(), to_json(&result.versions_in_window)));
        datasets.push((
            self.issues_per_version_path(),
            to_json(&result.issues_per_version),
        ));

        let writes = datasets.into_iter().map(|(path, content)| async move {
            let outcome = match content {
                Ok(content) => write_file(&path, &content).await,
                Err(err) => Err(err),
            };
            (path, outcome)
        });

        let mut summary = WriteSummary::default();
        for (path, outcome) in future::join_all(writes).await {
            match outcome {
                Ok(()) => {
                    debug!(path = %path.display(), "Wrote dataset");
                    summary.written.push(path);
                }
                Err(err) => {
                    error!(path = %path.display(), error = %err, "Failed to write dataset");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|err| Error::io(parent, err))?;
    }
    fs::write(path, content)
        .await
        .map_err(|err| Error::io(path, err))
}
