//! Caller-facing facade over the managers and the closer.
//!
//! Every operation takes the repository lock for its full duration, so
//! foreground edits and the background sweep never interleave.
//!
//! ```
//! use std::sync::Arc;
//!
//! use tasktrack::clock::SystemClock;
//! use tasktrack::config::Limits;
//! use tasktrack::manager::TaskDraft;
//! use tasktrack::repository::{InMemoryRepository, shared};
//! use tasktrack::Tracker;
//! use tasktrack_model::Detail;
//!
//! let tracker = Tracker::new(
//!     shared(InMemoryRepository::new()),
//!     Limits::default(),
//!     Arc::new(SystemClock),
//! );
//! let project = tracker.create_project(&Detail::new("Garden", "spring beds"))?;
//! let board = tracker.tasks(&project);
//! let deadline = chrono::Local::now().date_naive().to_string();
//! board.create_task(&Detail::new("Dig", "north bed"), TaskDraft::new(deadline))?;
//! assert_eq!(board.list_tasks()?.len(), 1);
//! # Ok::<(), tasktrack::Error>(())
//! ```

use std::sync::Arc;

use tasktrack_model::{Detail, Project, ProjectId, Task};
use tracing::info;

use crate::clock::Clock;
use crate::closer::{SweepReport, TaskCloser};
use crate::config::Limits;
use crate::error::Result;
use crate::manager::{ProjectManager, TaskChanges, TaskDraft, TaskManager};
use crate::repository::{Repository, SharedRepository};

/// Project and task operations over a shared repository.
pub struct Tracker<R> {
    repo: SharedRepository<R>,
    projects: ProjectManager,
    limits: Limits,
    clock: Arc<dyn Clock>,
}

impl<R: Repository> Tracker<R> {
    /// Creates a tracker enforcing `limits`.
    pub fn new(repo: SharedRepository<R>, limits: Limits, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            projects: ProjectManager::projects(&limits, Arc::clone(&clock)),
            limits,
            clock,
        }
    }

    /// The shared repository, for wiring other components to the same lock.
    pub const fn repository(&self) -> &SharedRepository<R> {
        &self.repo
    }

    /// The limits in force.
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns a limit or validation error.
    pub fn create_project(&self, detail: &Detail) -> Result<Project> {
        let mut repo = self.repo.lock();
        let project = self.projects.create(&mut *repo, detail, ())?;
        info!(project = %project.id, title = project.detail.title(), "project created");
        Ok(project)
    }

    /// Replaces a project's title and description.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the project is
    /// gone, or a validation error.
    pub fn update_project(&self, project: &Project, detail: &Detail) -> Result<Project> {
        let mut repo = self.repo.lock();
        self.projects.update(&mut *repo, project, Some(detail), ())
    }

    /// Deletes a project and all of its tasks, returning how many tasks were
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the project is
    /// gone.
    pub fn delete_project(&self, project: &Project) -> Result<usize> {
        let mut repo = self.repo.lock();
        let removed = self.projects.remove(&mut *repo, project)?;
        info!(project = %project.id, tasks = removed, "project deleted");
        Ok(removed)
    }

    /// Lists projects in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`](crate::Error::Storage) if the store fails.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.projects.list(&*self.repo.lock())
    }

    /// The project at `index` in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if out of range.
    pub fn project(&self, index: usize) -> Result<Project> {
        self.projects.get_by_index(&*self.repo.lock(), index)
    }

    /// The current stored state of `project`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if it was deleted.
    pub fn find_project(&self, project: &Project) -> Result<Project> {
        self.projects.get_by_identity(&*self.repo.lock(), project)
    }

    /// Task operations bound to `project`.
    pub fn tasks(&self, project: &Project) -> TaskBoard<'_, R> {
        TaskBoard {
            repo: &self.repo,
            tasks: TaskManager::for_project(project, &self.limits, Arc::clone(&self.clock)),
        }
    }

    /// A closer sharing this tracker's repository and clock.
    pub fn closer(&self) -> TaskCloser<R> {
        TaskCloser::new(Arc::clone(&self.repo), Arc::clone(&self.clock))
    }

    /// Runs one overdue sweep immediately.
    ///
    /// # Errors
    ///
    /// Returns the first repository failure.
    pub fn run_overdue_sweep_once(&self) -> Result<SweepReport> {
        self.closer().close_overdue_tasks()
    }
}

/// Task operations for one project, obtained from [`Tracker::tasks`].
pub struct TaskBoard<'a, R> {
    repo: &'a SharedRepository<R>,
    tasks: TaskManager,
}

impl<R: Repository> TaskBoard<'_, R> {
    /// The project this board operates on.
    pub const fn project_id(&self) -> &ProjectId {
        self.tasks.project_id()
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns a limit or validation error, or
    /// [`Error::NotFound`](crate::Error::NotFound) if the project is gone.
    pub fn create_task(&self, detail: &Detail, draft: TaskDraft) -> Result<Task> {
        let mut repo = self.repo.lock();
        let task = self.tasks.create(&mut *repo, detail, draft)?;
        info!(project = %self.project_id(), task = %task.id, "task created");
        Ok(task)
    }

    /// Edits a task. `detail` replaces title and description when given;
    /// blank or absent `changes` fields are left as they are.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or
    /// [`Error::NotFound`](crate::Error::NotFound) if the task is gone.
    pub fn update_task(
        &self,
        task: &Task,
        detail: Option<&Detail>,
        changes: TaskChanges,
    ) -> Result<Task> {
        let mut repo = self.repo.lock();
        self.tasks.update(&mut *repo, task, detail, changes)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if it is gone.
    pub fn delete_task(&self, task: &Task) -> Result<()> {
        let mut repo = self.repo.lock();
        self.tasks.remove(&mut *repo, task)?;
        info!(project = %self.project_id(), task = %task.id, "task deleted");
        Ok(())
    }

    /// Lists the project's tasks in creation order. A deleted project has
    /// none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`](crate::Error::Storage) if the store fails.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.list(&*self.repo.lock())
    }

    /// The task at `index` in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if out of range.
    pub fn task(&self, index: usize) -> Result<Task> {
        self.tasks.get_by_index(&*self.repo.lock(), index)
    }

    /// The current stored state of `task`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if it was deleted.
    pub fn find_task(&self, task: &Task) -> Result<Task> {
        self.tasks.get_by_identity(&*self.repo.lock(), task)
    }
}
