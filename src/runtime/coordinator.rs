// src/runtime/coordinator.rs
//! Simulation coordinator
//!
//! Spawns one task per gopher, then drains the shared report channel until
//! every gopher has reported.
//!
//! # Architecture
//!
//! ```text
//!   Gopher A ─┐
//!   Gopher B ─┼─▶ unbounded mpsc ──▶ collect_reports (N reports)
//!   Gopher C ─┘
//!      │
//!   TaskTracker ──▶ waiter task (all gopher tasks exited)
//! ```
//!
//! Completion tracking and draining are independent: the channel only
//! closes once every gopher task has dropped its sender, and the drain loop
//! never waits on the tracker before it has what it needs. Cancelling the
//! shutdown token stops every gopher at its next nap.

use crate::runtime::food_pool::{FoodPool, PoolStats};
use crate::runtime::gopher::Gopher;
use crate::runtime::report::TerminationReport;
use crate::utils::errors::{FarmError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, info_span, warn, Instrument};
use ulid::Ulid;

/// Result of a completed simulation
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Identifier attached to every log line of the run
    pub run_id: Ulid,

    /// Termination reports in arrival order
    pub reports: Vec<TerminationReport>,

    /// Pool state after the last gopher died
    pub pool: PoolStats,
}

/// Runs a roster of gophers against one food pool
pub struct Coordinator {
    roster: Vec<Gopher>,
    pool: Arc<FoodPool>,
    deadline: Option<Duration>,
}

impl Coordinator {
    pub fn new(roster: Vec<Gopher>, pool: Arc<FoodPool>) -> Self {
        Self {
            roster,
            pool,
            deadline: None,
        }
    }

    /// Abort with [`FarmError::DeadlineExceeded`] if the run takes longer
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run until every gopher has died
    pub async fn run(self) -> Result<SimulationOutcome> {
        let run_id = Ulid::new();
        let span = info_span!("simulation", %run_id, gophers = self.roster.len());
        let pool = Arc::clone(&self.pool);

        let reports = async move {
            let shutdown = CancellationToken::new();
            let simulation = run_until_cancelled(self.roster, self.pool, shutdown.clone());

            match self.deadline {
                Some(deadline) => {
                    tokio::pin!(simulation);

                    tokio::select! {
                        biased;
                        result = &mut simulation => result,
                        () = tokio::time::sleep(deadline) => {
                            error!(?deadline, "simulation deadline exceeded");
                            shutdown.cancel();
                            // Returns once every gopher task has stopped
                            let _ = simulation.await;
                            Err(FarmError::DeadlineExceeded(deadline))
                        }
                    }
                }
                None => simulation.await,
            }
        }
        .instrument(span)
        .await?;

        Ok(SimulationOutcome {
            run_id,
            reports,
            pool: pool.stats(),
        })
    }
}

/// Run every gopher in `roster` against `pool` and collect their reports
///
/// Returns exactly one report per gopher, in the order they arrived.
pub async fn run_simulation(
    roster: Vec<Gopher>,
    pool: Arc<FoodPool>,
) -> Result<Vec<TerminationReport>> {
    run_until_cancelled(roster, pool, CancellationToken::new()).await
}

/// Like [`run_simulation`], but stops early once `shutdown` is cancelled
///
/// On cancellation every gopher is told to stop and this returns
/// [`FarmError::Cancelled`] only after all gopher tasks have exited, so the
/// pool no longer changes.
pub async fn run_until_cancelled(
    roster: Vec<Gopher>,
    pool: Arc<FoodPool>,
    shutdown: CancellationToken,
) -> Result<Vec<TerminationReport>> {
    let expected = roster.len();
    let (tx, rx) = mpsc::unbounded_channel();
    let tracker = TaskTracker::new();

    for gopher in roster {
        info!(gopher = %gopher.name, "gopher {} joins the farm!", gopher.name);
        tracker.spawn(
            gopher
                .run_until(Arc::clone(&pool), tx.clone(), shutdown.child_token())
                .in_current_span(),
        );
    }
    tracker.close();

    // Only gopher tasks may keep the channel open
    drop(tx);

    let waiter = tokio::spawn({
        let tracker = tracker.clone();
        async move {
            tracker.wait().await;
            debug!("all gopher tasks exited");
        }
        .in_current_span()
    });

    info!("waiting");
    let reports = tokio::select! {
        biased;
        result = collect_reports(rx, expected) => result?,
        () = shutdown.cancelled() => {
            warn!("simulation cancelled, waiting for gophers to stop");
            tracker.wait().await;
            return Err(FarmError::Cancelled);
        }
    };

    waiter.await?;
    info!("done waiting");

    Ok(reports)
}

/// Receive exactly `expected` reports from `rx`
///
/// A channel that closes early means some gopher exited without reporting;
/// that is reported as [`FarmError::ReportChannelClosed`].
pub async fn collect_reports(
    mut rx: UnboundedReceiver<TerminationReport>,
    expected: usize,
) -> Result<Vec<TerminationReport>> {
    let mut reports = Vec::with_capacity(expected);

    while reports.len() < expected {
        match rx.recv().await {
            Some(report) => {
                info!(gopher = %report.gopher, meals = report.meals, "{}", report);
                reports.push(report);
            }
            None => {
                error!(expected, received = reports.len(), "report channel was closed");
                return Err(FarmError::ReportChannelClosed {
                    expected,
                    received: reports.len(),
                });
            }
        }
    }

    rx.close();
    if let Ok(extra) = rx.try_recv() {
        warn!(gopher = %extra.gopher, "unexpected report after collection finished");
    }

    Ok(reports)
}
