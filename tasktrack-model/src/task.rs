//! Task entity, status and close-time rules.
//!
//! A task moves `todo` → `doing` → `done`. `closed_at` records when the task
//! last entered `done` and is cleared when it leaves `done` again. Both the
//! manual update path and the overdue sweep go through
//! [`Task::set_status`], so the rule lives in one place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Detail, Entity, EntityKind};

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
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

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    Doing,
    /// Finished, either by hand or by the overdue sweep.
    Done,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Doing, Self::Done];

    /// Returns the lowercase name used in text input and serialized forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a [`TaskStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

impl std::str::FromStr for TaskStatus {
    type Err = ParseStatusError;

    /// Parses `todo`, `doing` or `done`, ignoring ASCII case and
    /// surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Title and description.
    pub detail: Detail,
    /// Calendar date the task is due.
    pub deadline: NaiveDate,
    /// Current status.
    pub status: TaskStatus,
    /// When the task last entered [`TaskStatus::Done`].
    pub closed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds an open (`todo`) task with a fresh identifier.
    #[must_use]
    pub fn new(detail: Detail, deadline: NaiveDate) -> Self {
        Self {
            id: TaskId::new(),
            detail,
            deadline,
            status: TaskStatus::Todo,
            closed_at: None,
        }
    }

    /// Returns `true` if the deadline lies strictly before `today` and the
    /// task is not done yet.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline < today && self.status != TaskStatus::Done
    }

    /// Moves the task to `status`, maintaining `closed_at`.
    ///
    /// Entering `done` stamps `closed_at` with `at`; leaving `done` clears
    /// it. Setting the status a task already has changes nothing, so a done
    /// task keeps its original close time.
    pub fn set_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        match (self.status, status) {
            (TaskStatus::Done, TaskStatus::Done) => {}
            (_, TaskStatus::Done) => self.closed_at = Some(at),
            (TaskStatus::Done, _) => self.closed_at = None,
            _ => {}
        }
        self.status = status;
    }
}

impl Entity for Task {
    type Id = TaskId;
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn detail(&self) -> &Detail {
        &self.detail
    }
}
