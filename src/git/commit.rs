use crate::model::{ReportWindow, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Repository, Sort};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub subject: String,
    pub author_name: String,
    pub author_email: String,
    pub author_date: DateTime<FixedOffset>,
}

impl Commit {
    pub fn new(
        hash: impl ToString,
        subject: impl ToString,
        author_name: impl ToString,
        author_email: impl ToString,
        author_date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            hash: hash.to_string(),
            subject: subject.to_string(),
            author_name: author_name.to_string(),
            author_email: author_email.to_string(),
            author_date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogRequest {
    pub repository_path: PathBuf,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub limit: usize,
    pub all_branches: bool,
}

impl LogRequest {
    pub fn new(
        repository_path: impl Into<PathBuf>,
        window: &ReportWindow,
        limit: usize,
        all_branches: bool,
    ) -> Self {
        Self {
            repository_path: repository_path.into(),
            since: window.since(),
            until: window.until(),
            limit,
            all_branches,
        }
    }
}

pub trait CommitLogReader {
    async fn read_log(&self, request: &LogRequest) -> Result<Vec<Commit>>;
}

/// Reads history straight from the object database with libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLogReader;

impl CommitLogReader for GitLogReader {
    async fn read_log(&self, request: &LogRequest) -> Result<Vec<Commit>> {
        let request = request.clone();
        tokio::task::spawn_blocking(move || read_commits(&request)).await?
    }
}

fn read_commits(request: &LogRequest) -> Result<Vec<Commit>> {
    let repo = Repository::open(&request.repository_path)?;
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    if request.all_branches {
        revwalk.push_glob("*")?;
    } else {
        revwalk.push_head()?;
    }

    let mut commits = Vec::new();
    for id in revwalk {
        if commits.len() >= request.limit {
            break;
        }
        let git_commit = repo.find_commit(id?)?;
        let commit = git_commit_to_commit(&git_commit);
        let author_date = commit.author_date.with_timezone(&Utc);
        if author_date >= request.since && author_date < request.until {
            commits.push(commit);
        }
    }
    Ok(commits)
}

fn git_commit_to_commit(git_commit: &git2::Commit<'_>) -> Commit {
    let author = git_commit.author();
    Commit::new(
        git_commit.id(),
        git_commit.summary().unwrap_or(""),
        author.name().unwrap_or(""),
        author.email().unwrap_or(""),
        git_time_to_datetime(&author.when()),
    )
}

fn git_time_to_datetime(time: &git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or(Utc.fix());
    DateTime::from_timestamp(time.seconds(), 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}
