//! Task lifecycle inside one project.
//!
//! A [`TaskManager`] is built for a specific project, so there is no way to
//! issue a task operation without first choosing which project it targets.

use std::sync::Arc;

use tasktrack_model::{Detail, Project, ProjectId, Task, TaskId};

use super::{EntityManager, EntityPolicy};
use crate::clock::Clock;
use crate::config::Limits;
use crate::error::Result;
use crate::repository::{Repository, RepositoryError};
use crate::validate;

/// Manages the tasks of one project.
pub type TaskManager = EntityManager<TaskPolicy>;

/// [`EntityPolicy`] for [`Task`], scoped by the owning project.
#[derive(Debug)]
pub enum TaskPolicy {}

/// Raw input for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Deadline as `YYYY-MM-DD`; required.
    pub deadline: String,
    /// Initial status; blank or absent means `todo`.
    pub status: Option<String>,
}

impl TaskDraft {
    /// A draft due on `deadline`, starting as `todo`.
    pub fn new(deadline: impl Into<String>) -> Self {
        Self {
            deadline: deadline.into(),
            status: None,
        }
    }

    /// Sets the initial status text.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Raw edits to a task's deadline and status. Absent or blank fields are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New deadline as `YYYY-MM-DD`.
    pub deadline: Option<String>,
    /// New status text.
    pub status: Option<String>,
}

impl TaskChanges {
    /// Sets the new deadline text.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the new status text.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl EntityPolicy for TaskPolicy {
    type Entity = Task;
    type Scope = ProjectId;
    type Draft = TaskDraft;
    type Changes = TaskChanges;

    fn load<R: Repository + ?Sized>(
        repo: &R,
        project: &ProjectId,
    ) -> Result<Vec<Task>, RepositoryError> {
        repo.list_tasks(project)
    }

    fn build(detail: Detail, draft: TaskDraft, clock: &dyn Clock) -> Result<Task> {
        let deadline = validate::required_deadline(&draft.deadline, clock.today())?;
        let status = validate::status(draft.status.as_deref().unwrap_or_default())?;

        let mut task = Task::new(detail, deadline);
        if let Some(status) = status {
            task.set_status(status, clock.now());
        }
        Ok(task)
    }

    fn apply(current: &Task, detail: Detail, changes: TaskChanges, clock: &dyn Clock) -> Result<Task> {
        let deadline = match changes.deadline.as_deref() {
            Some(text) => validate::changed_deadline(text, current.deadline, clock.today())?,
            None => None,
        };
        let status = match changes.status.as_deref() {
            Some(text) => validate::status(text)?,
            None => None,
        };

        let mut task = current.clone();
        task.detail = detail;
        if let Some(deadline) = deadline {
            task.deadline = deadline;
        }
        if let Some(status) = status {
            task.set_status(status, clock.now());
        }
        Ok(task)
    }

    fn append<R: Repository + ?Sized>(
        repo: &mut R,
        project: &ProjectId,
        task: Task,
    ) -> Result<(), RepositoryError> {
        repo.append_task(project, task)
    }

    fn replace<R: Repository + ?Sized>(
        repo: &mut R,
        project: &ProjectId,
        task: &Task,
    ) -> Result<(), RepositoryError> {
        repo.update_task(project, task)
    }

    fn remove<R: Repository + ?Sized>(
        repo: &mut R,
        project: &ProjectId,
        id: &TaskId,
    ) -> Result<usize, RepositoryError> {
        repo.remove_task(project, id).map(|()| 0)
    }
}

impl EntityManager<TaskPolicy> {
    /// Creates the manager for the tasks of `project`.
    pub fn for_project(project: &Project, limits: &Limits, clock: Arc<dyn Clock>) -> Self {
        Self::new(project.id.clone(), limits, clock)
    }

    /// The project this manager is bound to.
    pub const fn project_id(&self) -> &ProjectId {
        self.scope()
    }
}
