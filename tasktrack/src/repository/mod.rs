//! Storage port consumed by the managers and the task closer.
//!
//! Defines the [`Repository`] trait for persisting projects and their
//! tasks, plus [`SharedRepository`], the single lock every mutation path
//! (foreground edits and the background sweep) goes through.
//!
//! Implementations include:
//! - [`InMemoryRepository`]: ordered in-process collections
//!
//! Relational adapters live outside this crate and implement the same trait.

pub mod memory;

use std::sync::Arc;

use parking_lot::Mutex;
use tasktrack_model::{Project, ProjectId, Task, TaskId};

pub use memory::InMemoryRepository;

/// A repository behind the whole-store lock.
///
/// Callers hold the lock for a complete read-validate-write cycle so that
/// no other mutator observes or interleaves with a half-applied change.
pub type SharedRepository<R> = Arc<Mutex<R>>;

/// Wraps a repository in a [`SharedRepository`].
pub fn shared<R: Repository>(repo: R) -> SharedRepository<R> {
    Arc::new(Mutex::new(repo))
}

/// Errors that can occur during repository operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The referenced project is not in the store.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The referenced task is not in the given project.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The backing store failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Storage-agnostic access to projects and their tasks.
///
/// Collections are ordered by insertion. Tasks are always addressed through
/// their owning project.
pub trait Repository: Send {
    /// Returns all projects in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] if the store cannot be read.
    fn list_projects(&self) -> Result<Vec<Project>, RepositoryError>;

    /// Returns the tasks of `project` in insertion order. A project that is
    /// absent has no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] if the store cannot be read.
    fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>, RepositoryError>;

    /// Appends a new project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] if the write fails; nothing is
    /// stored in that case.
    fn append_project(&mut self, project: Project) -> Result<(), RepositoryError>;

    /// Appends a new task to `project`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ProjectNotFound`] if the project is absent.
    fn append_task(&mut self, project: &ProjectId, task: Task) -> Result<(), RepositoryError>;

    /// Removes a project together with all of its tasks, returning the
    /// removed tasks.
    ///
    /// Either the project and every one of its tasks are removed, or
    /// nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ProjectNotFound`] if the project is absent.
    fn remove_project(&mut self, project: &ProjectId) -> Result<Vec<Task>, RepositoryError>;

    /// Removes one task from `project`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ProjectNotFound`] or
    /// [`RepositoryError::TaskNotFound`].
    fn remove_task(&mut self, project: &ProjectId, task: &TaskId) -> Result<(), RepositoryError>;

    /// Replaces the stored project that has `project.id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ProjectNotFound`] if it is absent.
    fn update_project(&mut self, project: &Project) -> Result<(), RepositoryError>;

    /// Replaces the stored task of `project` that has `task.id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ProjectNotFound`] or
    /// [`RepositoryError::TaskNotFound`].
    fn update_task(&mut self, project: &ProjectId, task: &Task) -> Result<(), RepositoryError>;
}
