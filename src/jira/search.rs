use crate::jira::transport::SearchRequest;
use crate::jira::{Issue, RetrievalError, TrackerError, TrackerTransport};
use crate::utils::RateLimiter;
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: u32 = 500;

pub struct TrackerSearchClient<'a, T> {
    transport: &'a T,
    limiter: &'a RateLimiter,
    page_size: u32,
}

impl<'a, T: TrackerTransport> TrackerSearchClient<'a, T> {
    pub fn new(transport: &'a T, limiter: &'a RateLimiter, page_size: u32) -> Self {
        Self {
            transport,
            limiter,
            page_size: page_size.max(1),
        }
    }

    /// Every issue matching `query`, across as many pages as the tracker
    /// needs. Any failing page fails the whole search.
    pub async fn search(&self, query: &str) -> Result<Vec<Issue>, RetrievalError> {
        let mut issues = Vec::new();
        let mut start_at = 0;
        loop {
            let request = SearchRequest::new(query, start_at, self.page_size);
            let page = self
                .limiter
                .schedule(|| self.transport.search(&request))
                .await
                .map_err(|source| RetrievalError::Search {
                    query: query.to_string(),
                    source,
                })?;

            let received = page.issues.len() as u32;
            let furthest_obtained = page.start_at.saturating_add(page.max_results);
            debug!(
                query,
                start_at = page.start_at,
                received,
                total = page.total,
                "fetched search page"
            );
            issues.extend(page.issues.into_iter().map(Issue::from));

            if furthest_obtained >= page.total || received == 0 || received < page.max_results {
                break;
            }
            if furthest_obtained <= start_at {
                return Err(RetrievalError::Search {
                    query: query.to_string(),
                    source: TrackerError::Stalled {
                        start_at,
                        max_results: page.max_results,
                    },
                });
            }
            start_at = furthest_obtained;
        }
        Ok(issues)
    }

    /// One issue by key, or `None` when the tracker no longer knows it.
    pub async fn find_issue(&self, key: &str) -> Result<Option<Issue>, RetrievalError> {
        match self.limiter.schedule(|| self.transport.issue(key)).await {
            Ok(raw) => Ok(Some(Issue::from(raw))),
            Err(err) if err.is_not_found() => {
                info!(key, "Issue key is invalid, continuing");
                Ok(None)
            }
            Err(source) => Err(RetrievalError::Issue {
                key: key.to_string(),
                source,
            }),
        }
    }
}
