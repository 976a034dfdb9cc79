//! Daily overdue sweep.
//!
//! [`Scheduler::spawn`] starts a background tokio task that sleeps until the
//! configured time of day, runs one [`TaskCloser`] sweep on the blocking
//! pool, reports the outcome to a [`SweepObserver`], and repeats. A failed
//! or panicking sweep is reported and the loop carries on with the next
//! trigger.
//!
//! Shutdown is by channel drop: [`SchedulerHandle::stop`] (or dropping the
//! handle) closes the shutdown channel. A sweep already running completes
//! before the loop exits.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::closer::{SweepReport, TaskCloser};
use crate::error::Error;
use crate::repository::Repository;

/// Why a scheduled sweep produced no report.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The sweep returned an error.
    #[error("overdue sweep failed: {0}")]
    Repository(#[from] Error),

    /// The sweep panicked.
    #[error("overdue sweep panicked: {0}")]
    Panicked(String),
}

/// Receives the outcome of every scheduled sweep.
pub trait SweepObserver: Send + Sync {
    /// Called after a sweep completes.
    fn on_success(&self, report: &SweepReport);

    /// Called after a sweep fails or panics.
    fn on_failure(&self, error: &SweepError);
}

/// Logs sweep outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SweepObserver for TracingObserver {
    fn on_success(&self, report: &SweepReport) {
        info!(
            closed = report.closed_count(),
            inspected = report.inspected,
            at = %report.at,
            "scheduled overdue sweep completed"
        );
    }

    fn on_failure(&self, error: &SweepError) {
        error!(%error, "scheduled overdue sweep failed");
    }
}

/// Time from `now` until the next occurrence of `at`.
///
/// A trigger time equal to `now` counts as already passed, so the result is
/// always strictly positive and at most one day.
///
/// The delay is measured in naive wall-clock time. Across a daylight saving
/// change the sleep is off by the shift: a spring-forward gap fires late by
/// the skipped hour, and a fall-back overlap fires early, after which the
/// loop recomputes and fires again at the real trigger. Sweeps are
/// idempotent, so the extra run closes nothing new.
#[must_use]
pub fn next_run_delay(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let mut next = now.date().and_time(at);
    if next <= now {
        next += TimeDelta::days(1);
    }
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// Runs [`TaskCloser`] sweeps once a day.
pub struct Scheduler<R> {
    closer: TaskCloser<R>,
    close_time: NaiveTime,
    observer: Arc<dyn SweepObserver>,
}

impl<R: Repository + 'static> Scheduler<R> {
    /// A scheduler that sweeps every day at `close_time` (in the closer's
    /// clock's local time) and logs outcomes.
    pub fn new(closer: TaskCloser<R>, close_time: NaiveTime) -> Self {
        Self {
            closer,
            close_time,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the outcome observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SweepObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Starts the sweep loop on the current tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let join = tokio::spawn(self.run(shutdown_rx));
        info!("overdue sweep scheduler started");
        SchedulerHandle {
            shutdown: shutdown_tx,
            join,
        }
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        loop {
            let delay = next_run_delay(self.closer.clock().local_now(), self.close_time);
            debug!(delay_secs = delay.as_secs(), "next overdue sweep scheduled");

            tokio::select! {
                _ = &mut shutdown => break,
                () = tokio::time::sleep(delay) => {}
            }

            match self.sweep().await {
                Ok(report) => self.observer.on_success(&report),
                Err(err) => self.observer.on_failure(&err),
            }
        }
        info!("overdue sweep scheduler stopped");
    }

    async fn sweep(&self) -> Result<SweepReport, SweepError> {
        let closer = self.closer.clone();
        tokio::task::spawn_blocking(move || closer.close_overdue_tasks())
            .await
            .map_err(|err| SweepError::Panicked(panic_message(err)))?
            .map_err(SweepError::from)
    }
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// Controls a running [`Scheduler`]. Dropping the handle also stops it.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops the loop and waits for it to exit, including any sweep in
    /// progress.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.join.await {
            warn!(%err, "scheduler task ended abnormally");
        }
    }

    /// Returns `true` once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
