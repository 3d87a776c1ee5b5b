mod correlate;
mod git;
mod jira;
mod model;
mod report;
mod utils;

use crate::correlate::{CorrelationPipeline, IssueKeyExtractor, DEFAULT_KEY_PATTERN};
use crate::git::{CommitLogReader, GitLogReader};
use crate::jira::{JiraRestTransport, TrackerTransport};
use crate::report::SnapshotWriter;
use crate::utils::{ProgressStyleTemplate, RateLimiter};
use clap::Parser;
use indicatif::ProgressBar;
use model::{Error, Repository, ReportWindow, Result, Settings, TrackerSettings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug, Clone)]
struct Args {
    #[arg(short = 'u', long, env = "JIRA_USERNAME")]
    username: String,
    #[arg(short = 'p', long, env = "JIRA_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, env = "REPORT_SINCE")]
    since: String,
    #[arg(long, env = "REPORT_UNTIL")]
    until: String,
    #[arg(long = "jira-url", env = "JIRA_URL")]
    jira_url: String,
    #[arg(long, env = "JIRA_PROJECT", default_value = "DEV")]
    project: String,
    #[arg(long = "repos", default_value = "repositories.json")]
    repos_path: String,
    #[arg(long, default_value = "workspace")]
    workspace: PathBuf,
    #[arg(long = "out", default_value = "downloaded_data")]
    output_dir: PathBuf,
    #[arg(long = "rate-limit-ms", default_value_t = 200)]
    rate_limit_ms: u64,
    #[arg(long = "page-size", default_value_t = jira::search::DEFAULT_PAGE_SIZE)]
    page_size: u32,
    #[arg(long = "commit-limit", default_value_t = 50_000)]
    commit_limit: usize,
    #[arg(long = "all-branches", default_value_t = true, action = clap::ArgAction::Set)]
    all_branches: bool,
    #[arg(long = "key-pattern", default_value = DEFAULT_KEY_PATTERN)]
    key_pattern: String,
    #[arg(long = "excluded-resolution", default_value = "LegacyBug")]
    excluded_resolution: String,
    #[arg(long = "timeout-secs", default_value_t = 60)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    exit_code(run(&args).await)
}

/// Only startup and project-wide failures reach here; skipped repositories
/// and failed dataset writes still end the run successfully.
fn exit_code(outcome: Result<()>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Run aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let settings = build_settings(args)?;
    let transport = JiraRestTransport::new(&settings.tracker)
        .map_err(|err| Error::Config(format!("Cannot build tracker client: {}", err)))?;
    snapshot(&settings, &transport, &GitLogReader).await
}

async fn snapshot<T: TrackerTransport, R: CommitLogReader>(
    settings: &Settings,
    transport: &T,
    log_reader: &R,
) -> Result<()> {
    let extractor = IssueKeyExtractor::new(&settings.key_pattern)
        .map_err(|err| Error::Config(format!("Invalid key pattern: {}", err)))?;
    let limiter = RateLimiter::new(settings.tracker.request_spacing);
    let writer = SnapshotWriter::new(&settings.output_dir);
    writer.ensure_layout().await?;

    info!(
        since = %settings.window.start,
        until = %settings.window.end,
        repositories = settings.repositories.len(),
        spacing_ms = limiter.spacing().as_millis() as u64,
        "Starting correlation run"
    );

    let pb = ProgressBar::new(settings.repositories.len() as u64);
    pb.set_style(ProgressStyleTemplate::number_bar());
    pb.set_message("Repositories");
    let progress_pb = pb.clone();
    let progress = move |repo: &Repository| {
        progress_pb.set_message(repo.name.clone());
        progress_pb.inc(1);
    };

    let pipeline =
        CorrelationPipeline::new(settings, transport, &limiter, log_reader, &extractor);
    let result = pipeline.run(Box::new(progress)).await;
    pb.finish_and_clear();
    let result = result?;

    for skipped in &result.skipped {
        warn!(
            repository = %skipped.name,
            reason = %skipped.reason,
            "Repository left out of snapshot"
        );
    }

    let summary = writer.write_all(&result).await;
    info!(
        out = %writer.root().display(),
        written = summary.written.len(),
        failed = summary.failed,
        skipped_repositories = result.skipped.len(),
        "Snapshot written"
    );
    Ok(())
}

fn build_settings(args: &Args) -> Result<Settings> {
    let window = ReportWindow::parse(&args.since, &args.until)?;
    let repositories = Repository::from_config(&args.repos_path, Path::new(&args.workspace))?;
    Ok(Settings {
        tracker: TrackerSettings {
            base_url: args.jira_url.clone(),
            username: args.username.clone(),
            password: args.password.clone(),
            project: args.project.clone(),
            page_size: args.page_size,
            request_spacing: Duration::from_millis(args.rate_limit_ms),
            request_timeout: Duration::from_secs(args.timeout_secs),
            excluded_resolution: args.excluded_resolution.clone(),
        },
        window,
        repositories,
        key_pattern: args.key_pattern.clone(),
        commit_limit: args.commit_limit,
        all_branches: args.all_branches,
        output_dir: args.output_dir.clone(),
    })
}
