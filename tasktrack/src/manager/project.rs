//! Project lifecycle: the top-level collection, with cascading delete.

use std::sync::Arc;

use tasktrack_model::{Detail, Project, ProjectId};

use super::{EntityManager, EntityPolicy};
use crate::clock::Clock;
use crate::config::Limits;
use crate::error::Result;
use crate::repository::{Repository, RepositoryError};

/// Manages the project collection.
pub type ProjectManager = EntityManager<ProjectPolicy>;

/// [`EntityPolicy`] for [`Project`].
#[derive(Debug)]
pub enum ProjectPolicy {}

impl EntityPolicy for ProjectPolicy {
    type Entity = Project;
    type Scope = ();
    type Draft = ();
    type Changes = ();

    fn load<R: Repository + ?Sized>(repo: &R, (): &()) -> Result<Vec<Project>, RepositoryError> {
        repo.list_projects()
    }

    fn build(detail: Detail, (): (), _clock: &dyn Clock) -> Result<Project> {
        Ok(Project::new(detail))
    }

    fn apply(current: &Project, detail: Detail, (): (), _clock: &dyn Clock) -> Result<Project> {
        Ok(Project {
            id: current.id.clone(),
            detail,
        })
    }

    fn append<R: Repository + ?Sized>(
        repo: &mut R,
        (): &(),
        project: Project,
    ) -> Result<(), RepositoryError> {
        repo.append_project(project)
    }

    fn replace<R: Repository + ?Sized>(
        repo: &mut R,
        (): &(),
        project: &Project,
    ) -> Result<(), RepositoryError> {
        repo.update_project(project)
    }

    fn remove<R: Repository + ?Sized>(
        repo: &mut R,
        (): &(),
        id: &ProjectId,
    ) -> Result<usize, RepositoryError> {
        repo.remove_project(id).map(|tasks| tasks.len())
    }
}

impl EntityManager<ProjectPolicy> {
    /// Creates the manager for the project collection.
    pub fn projects(limits: &Limits, clock: Arc<dyn Clock>) -> Self {
        Self::new((), limits, clock)
    }
}
