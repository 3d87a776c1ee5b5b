//! Global spacing for outbound tracker calls.
//!
//! Every scheduled operation waits for the single dispatch slot, then for the
//! configured spacing since the previous dispatch, and runs while still
//! holding the slot. The tokio mutex queues waiters fairly, so operations are
//! dispatched in submission order and never overlap.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

pub const DEFAULT_SPACING: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct RateLimiter {
    spacing: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Runs `operation` once its turn comes and returns whatever it returns.
    ///
    /// The dispatch time is recorded before the operation starts, so a failed
    /// operation still pushes back the next one.
    pub async fn schedule<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last_dispatch = self.last_dispatch.lock().await;
        if let Some(last) = *last_dispatch {
            let ready_at = last + self.spacing;
            if ready_at > Instant::now() {
                let wait_ms = (ready_at - Instant::now()).as_millis() as u64;
                tracing::debug!(wait_ms, "waiting for tracker slot");
                sleep_until(ready_at).await;
            }
        }
        *last_dispatch = Some(Instant::now());
        operation().await
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_SPACING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[tokio::test(start_paused = true)]
    async fn consecutive_dispatches_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        let mut starts = Vec::new();
        for _ in 0..5 {
            let start = limiter.schedule(|| async { Instant::now() }).await;
            starts.push(start);
        }
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(200));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_dispatch_is_immediate() {
        let limiter = RateLimiter::default();
        let before = Instant::now();
        let start = limiter.schedule(|| async { Instant::now() }).await;
        assert_eq!(start, before);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_run_in_submission_order_without_overlap() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(50)));
        let log = Arc::new(StdMutex::new(Vec::new()));

        let tasks = (0..4).map(|index| {
            let limiter = limiter.clone();
            let log = log.clone();
            async move {
                limiter
                    .schedule(|| async {
                        log.lock().unwrap().push(("start", index, Instant::now()));
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        log.lock().unwrap().push(("end", index, Instant::now()));
                    })
                    .await
            }
        });
        futures::future::join_all(tasks).await;

        let log = log.lock().unwrap();
        let order: Vec<_> = log.iter().map(|(event, index, _)| (*event, *index)).collect();
        assert_eq!(
            order,
            [
                ("start", 0),
                ("end", 0),
                ("start", 1),
                ("end", 1),
                ("start", 2),
                ("end", 2),
                ("start", 3),
                ("end", 3),
            ]
        );
        let starts: Vec<_> = log
            .iter()
            .filter(|(event, _, _)| *event == "start")
            .map(|(_, _, at)| *at)
            .collect();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(50));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_propagate_and_still_consume_the_slot() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        let failed: Result<(), &str> = limiter.schedule(|| async { Err("boom") }).await;
        assert_eq!(failed, Err("boom"));

        let failed_at = Instant::now();
        let next = limiter.schedule(|| async { Instant::now() }).await;
        assert!(next - failed_at >= Duration::from_millis(200));
    }
}
