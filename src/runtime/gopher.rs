// src/runtime/gopher.rs
//! A single gopher and its life cycle
//!
//! ```text
//! Running ──(withdrawal refused)──▶ Terminated
//!    ▲  │
//!    └──┘ sleep, eat
//! ```
//!
//! A gopher keeps eating for as long as the pool can satisfy its appetite.
//! The first refused withdrawal is its last action: it publishes one
//! [`TerminationReport`] and its task returns.

use crate::runtime::food_pool::FoodPool;
use crate::runtime::report::TerminationReport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Lifecycle state of a gopher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GopherState {
    Running,
    Terminated,
}

/// A gopher with a fixed appetite and rhythm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gopher {
    /// Used for reporting only
    pub name: String,

    /// Pause before every meal
    pub sleep: Duration,

    /// Food units taken per meal
    pub eat: u64,
}

impl Gopher {
    pub fn new(name: impl Into<String>, sleep: Duration, eat: u64) -> Self {
        Self {
            name: name.into(),
            sleep,
            eat,
        }
    }

    /// Live until the pool can no longer feed this gopher
    ///
    /// Consumes the gopher, so a terminated gopher can neither eat nor
    /// report again. Sending never blocks; if the coordinator is already
    /// gone the report is dropped with a warning.
    pub async fn run(self, pool: Arc<FoodPool>, reports: UnboundedSender<TerminationReport>) {
        self.run_until(pool, reports, CancellationToken::new()).await
    }

    /// Like [`Gopher::run`], but stops at the next nap once `shutdown` fires
    ///
    /// A stopped gopher sends no report: the coordinator has already given
    /// up collecting when it cancels.
    pub async fn run_until(
        self,
        pool: Arc<FoodPool>,
        reports: UnboundedSender<TerminationReport>,
        shutdown: CancellationToken,
    ) {
        let mut state = GopherState::Running;
        let mut meals = 0u64;

        while state == GopherState::Running {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    debug!(gopher = %self.name, meals, "gopher stopped by shutdown");
                    return;
                }
                () = self.nap() => {}
            }

            match pool.try_withdraw(&self.name, self.eat) {
                Ok(remaining) => {
                    meals += 1;
                    debug!(gopher = %self.name, meals, remaining, "gopher ate");
                }
                Err(shortfall) => {
                    state = GopherState::Terminated;
                    debug!(gopher = %self.name, meals, %shortfall, "gopher starving");

                    if reports.send(TerminationReport::new(&self.name, meals)).is_err() {
                        warn!(gopher = %self.name, "report channel closed, dropping termination report");
                    }
                }
            }
        }
    }

    /// Suspend between meals without holding the pool
    async fn nap(&self) {
        if self.sleep.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.sleep).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_eats_until_empty_then_reports() {
        let pool = Arc::new(FoodPool::new(5));
        let (tx, mut rx) = mpsc::unbounded_channel();

        Gopher::new("A", Duration::ZERO, 5)
            .run(Arc::clone(&pool), tx)
            .await;

        let report = rx.recv().await.unwrap();
        assert_eq!(report.gopher, "A");
        assert_eq!(report.meals, 1);
        assert_eq!(pool.remaining(), 0);

        // sender was dropped with the finished gopher
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_too_hungry_dies_immediately() {
        let pool = Arc::new(FoodPool::new(5));
        let (tx, mut rx) = mpsc::unbounded_channel();

        Gopher::new("A", Duration::ZERO, 10)
            .run(Arc::clone(&pool), tx)
            .await;

        let report = rx.recv().await.unwrap();
        assert_eq!(report.meals, 0);
        assert_eq!(pool.remaining(), 5);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_no_withdrawals_after_termination() {
        let pool = Arc::new(FoodPool::new(7));
        let (tx, mut rx) = mpsc::unbounded_channel();

        Gopher::new("A", Duration::ZERO, 3)
            .run(Arc::clone(&pool), tx)
            .await;

        let stats = pool.stats();
        assert_eq!(stats.successful_withdrawals, 2);
        assert_eq!(stats.failed_withdrawals, 1);
        assert_eq!(stats.remaining_food, 1);

        assert_eq!(rx.recv().await.unwrap().meals, 2);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_between_meals() {
        let pool = Arc::new(FoodPool::new(4));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = tokio::time::Instant::now();

        Gopher::new("A", Duration::from_secs(2), 2)
            .run(Arc::clone(&pool), tx)
            .await;

        // two meals and one refused attempt, each after a 2s nap
        assert_eq!(started.elapsed(), Duration::from_secs(6));
        assert_eq!(rx.recv().await.unwrap().meals, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_without_report() {
        let pool = Arc::new(FoodPool::new(100));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(Gopher::new("A", Duration::from_secs(1), 10).run_until(
            Arc::clone(&pool),
            tx,
            shutdown.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(pool.remaining(), 80);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_channel_does_not_block() {
        let pool = Arc::new(FoodPool::new(0));
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        Gopher::new("A", Duration::ZERO, 1).run(pool, tx).await;
    }
}
