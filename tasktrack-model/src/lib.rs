//! Shared domain types for `TaskTrack`.
//!
//! Projects own tasks; both are entities described by a [`Detail`]. These
//! types carry no validation of their own: the `tasktrack` crate validates
//! every value before an entity is built or changed.

pub mod detail;
pub mod entity;
pub mod project;
pub mod task;

pub use detail::Detail;
pub use entity::{Entity, EntityKind};
pub use project::{Project, ProjectId};
pub use task::{ParseStatusError, Task, TaskId, TaskStatus};
