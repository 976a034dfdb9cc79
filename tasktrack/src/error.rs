//! Caller-facing error taxonomy.
//!
//! Every variant describes a recoverable condition: the caller re-prompts or
//! refreshes and retries. `Display` output is meant to be shown to users
//! as-is.

use tasktrack_model::EntityKind;

use crate::repository::RepositoryError;

/// Result alias for tracker operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by validators, managers and the tracker facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A text field was empty after trimming.
    #[error("{field} cannot be empty")]
    EmptyValue {
        /// Human-readable field name, e.g. `project title`.
        field: String,
    },

    /// A text field exceeded its configured maximum length.
    #[error("{field} is too long ({len} characters, max {max})")]
    MaxLength {
        /// Human-readable field name.
        field: String,
        /// Configured maximum in characters.
        max: usize,
        /// Length of the trimmed input in characters.
        len: usize,
    },

    /// A value collides with a sibling's value.
    #[error("{field} \"{value}\" already exists")]
    DuplicateValue {
        /// Human-readable field name.
        field: String,
        /// The colliding (trimmed) value.
        value: String,
    },

    /// The collection is already at its configured size limit.
    #[error("cannot create more than {max} {kind}s")]
    LimitExceeded {
        /// Kind of entity being created.
        kind: EntityKind,
        /// Configured maximum count.
        max: usize,
    },

    /// The referenced entity does not exist (or no longer exists).
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up.
        kind: EntityKind,
        /// Identifier or index that was looked up.
        key: String,
    },

    /// Status text did not name a known status.
    #[error("invalid status \"{0}\" (expected todo, doing or done)")]
    InvalidStatus(String),

    /// Deadline text was malformed or lies in the past.
    #[error("invalid date \"{value}\": {reason}")]
    InvalidDate {
        /// The offending input.
        value: String,
        /// Why it was rejected.
        reason: DateProblem,
    },

    /// The backing store failed for a reason other than a missing entity.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Why a deadline was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateProblem {
    /// No date was given where one is required.
    #[error("a deadline is required")]
    Missing,
    /// The text is not a `YYYY-MM-DD` calendar date.
    #[error("expected a date in YYYY-MM-DD format")]
    Malformed,
    /// The date lies before today.
    #[error("the date is in the past")]
    InPast,
}

impl Error {
    pub(crate) fn not_found(kind: EntityKind, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ProjectNotFound(id) => Self::not_found(EntityKind::Project, id),
            RepositoryError::TaskNotFound(id) => Self::not_found(EntityKind::Task, id),
            RepositoryError::Backend(reason) => Self::Storage(reason),
        }
    }
}
