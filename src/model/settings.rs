use crate::model::{Repository, ReportWindow};
use std::path::PathBuf;
use std::time::Duration;

/// Everything needed to reach the tracker.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub project: String,
    pub page_size: u32,
    pub request_spacing: Duration,
    pub request_timeout: Duration,
    pub excluded_resolution: String,
}

/// One run's configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub tracker: TrackerSettings,
    pub window: ReportWindow,
    pub repositories: Vec<Repository>,
    pub key_pattern: String,
    pub commit_limit: usize,
    pub all_branches: bool,
    pub output_dir: PathBuf,
}
