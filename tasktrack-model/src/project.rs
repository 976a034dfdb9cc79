//! Project entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Detail, Entity, EntityKind};

/// Unique identifier for a project, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new time-ordered project identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `ProjectId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A project: a titled container of tasks.
///
/// The tasks themselves are held by the store, keyed by the project's id,
/// and removed together with the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Title and description.
    pub detail: Detail,
}

impl Project {
    /// Builds a project with a fresh identifier.
    #[must_use]
    pub fn new(detail: Detail) -> Self {
        Self {
            id: ProjectId::new(),
            detail,
        }
    }
}

impl Entity for Project {
    type Id = ProjectId;
    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> &ProjectId {
        &self.id
    }

    fn detail(&self) -> &Detail {
        &self.detail
    }
}
