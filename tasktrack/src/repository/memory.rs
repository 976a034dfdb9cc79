//! In-memory implementation of [`Repository`].
//!
//! Projects are kept in an ordered list and each project's tasks in a
//! separate ordered list keyed by project id. Not persistent: all data is
//! lost when the process exits.

use std::collections::HashMap;

use tasktrack_model::{Project, ProjectId, Task, TaskId};

use super::{Repository, RepositoryError};

/// Ordered in-process project and task collections.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    projects: Vec<Project>,
    tasks: HashMap<ProjectId, Vec<Task>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of tasks across all projects.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    fn tasks_of_mut(&mut self, project: &ProjectId) -> Result<&mut Vec<Task>, RepositoryError> {
        self.tasks
            .get_mut(project)
            .ok_or_else(|| RepositoryError::ProjectNotFound(project.clone()))
    }
}

impl Repository for InMemoryRepository {
    fn list_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.projects.clone())
    }

    fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>, RepositoryError> {
        Ok(self.tasks.get(project).cloned().unwrap_or_default())
    }

    fn append_project(&mut self, project: Project) -> Result<(), RepositoryError> {
        self.tasks.entry(project.id.clone()).or_default();
        self.projects.push(project);
        Ok(())
    }

    fn append_task(&mut self, project: &ProjectId, task: Task) -> Result<(), RepositoryError> {
        self.tasks_of_mut(project)?.push(task);
        Ok(())
    }

    fn remove_project(&mut self, project: &ProjectId) -> Result<Vec<Task>, RepositoryError> {
        let index = self
            .projects
            .iter()
            .position(|p| &p.id == project)
            .ok_or_else(|| RepositoryError::ProjectNotFound(project.clone()))?;
        self.projects.remove(index);
        Ok(self.tasks.remove(project).unwrap_or_default())
    }

    fn remove_task(&mut self, project: &ProjectId, task: &TaskId) -> Result<(), RepositoryError> {
        let tasks = self.tasks_of_mut(project)?;
        let index = tasks
            .iter()
            .position(|t| &t.id == task)
            .ok_or_else(|| RepositoryError::TaskNotFound(task.clone()))?;
        tasks.remove(index);
        Ok(())
    }

    fn update_project(&mut self, project: &Project) -> Result<(), RepositoryError> {
        let slot = self
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| RepositoryError::ProjectNotFound(project.id.clone()))?;
        *slot = project.clone();
        Ok(())
    }

    fn update_task(&mut self, project: &ProjectId, task: &Task) -> Result<(), RepositoryError> {
        let slot = self
            .tasks_of_mut(project)?
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| RepositoryError::TaskNotFound(task.id.clone()))?;
        *slot = task.clone();
        Ok(())
    }
}
