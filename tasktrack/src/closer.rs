//! Overdue-task auto-closer.
//!
//! One sweep walks every task of every project under the repository lock and
//! marks each overdue one `done`, stamping `closed_at` with the sweep time.
//! Sweeps are idempotent: closed tasks are no longer overdue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tasktrack_model::{TaskId, TaskStatus};
use tracing::info;

use crate::clock::Clock;
use crate::error::Result;
use crate::repository::{Repository, SharedRepository};

/// Outcome of one sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of tasks looked at.
    pub inspected: usize,
    /// Tasks that were closed, in repository order.
    pub closed: Vec<TaskId>,
    /// Sweep time, recorded as `closed_at` on every closed task.
    pub at: DateTime<Utc>,
}

impl SweepReport {
    /// Number of tasks closed.
    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }
}

/// Closes overdue tasks across all projects.
pub struct TaskCloser<R> {
    repo: SharedRepository<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for TaskCloser<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: Repository> TaskCloser<R> {
    /// Creates a closer over `repo`.
    pub fn new(repo: SharedRepository<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// The clock sweeps are timed against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Runs one sweep.
    ///
    /// The repository lock is held for the whole sweep, so foreground edits
    /// see either none or all of its effects.
    ///
    /// # Errors
    ///
    /// Returns the first repository failure. Tasks closed before the failure
    /// stay closed; a later sweep picks up the rest.
    pub fn close_overdue_tasks(&self) -> Result<SweepReport> {
        let at = self.clock.now();
        let today = self.clock.today();

        let mut repo = self.repo.lock();
        let mut report = SweepReport {
            inspected: 0,
            closed: Vec::new(),
            at,
        };

        for project in repo.list_projects()? {
            for mut task in repo.list_tasks(&project.id)? {
                report.inspected += 1;
                if !task.is_overdue(today) {
                    continue;
                }
                task.set_status(TaskStatus::Done, at);
                repo.update_task(&project.id, &task)?;
                info!(
                    project = %project.id,
                    task = %task.id,
                    deadline = %task.deadline,
                    "closed overdue task"
                );
                report.closed.push(task.id);
            }
        }
        drop(repo);

        info!(
            inspected = report.inspected,
            closed = report.closed_count(),
            "overdue sweep finished"
        );
        Ok(report)
    }
}
