//! In-memory commit history used by the unit tests.

use crate::git::{Commit, CommitLogReader, LogRequest};
use crate::model::{Error, Result};
use chrono::DateTime;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Serves scripted logs by repository path; any other path fails like a
/// missing repository.
#[derive(Default)]
pub struct FakeLogReader {
    logs: HashMap<PathBuf, Vec<Commit>>,
    requests: Mutex<Vec<LogRequest>>,
}

impl FakeLogReader {
    pub fn with_log(mut self, path: &str, subjects: &[&str]) -> Self {
        let date = DateTime::parse_from_rfc3339("2017-12-01T10:00:00+00:00").unwrap();
        let commits = subjects
            .iter()
            .enumerate()
            .map(|(index, subject)| {
                Commit::new(format!("{:040}", index), subject, "Jess", "jess@example.com", date)
            })
            .collect();
        self.logs.insert(PathBuf::from(path), commits);
        self
    }

    pub fn requests(&self) -> Vec<LogRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CommitLogReader for FakeLogReader {
    async fn read_log(&self, request: &LogRequest) -> Result<Vec<Commit>> {
        self.requests.lock().unwrap().push(request.clone());
        self.logs
            .get(&request.repository_path)
            .cloned()
            .ok_or_else(|| Error::Git(git2::Error::from_str("could not find repository")))
    }
}
