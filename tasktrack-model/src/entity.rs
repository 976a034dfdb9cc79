//! Behaviour shared by projects and tasks.

use serde::{Deserialize, Serialize};

use crate::Detail;

/// Which kind of entity a value, limit or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A top-level project.
    Project,
    /// A task owned by a project.
    Task,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// An identifiable, titled member of a collection.
pub trait Entity {
    /// Identifier type, unique across the whole store.
    type Id: Clone + PartialEq + Eq + std::fmt::Display;

    /// The kind of this entity.
    const KIND: EntityKind;

    /// Returns the identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the title and description.
    fn detail(&self) -> &Detail;
}
