//! `TaskTrack`: project and task tracking with validated lifecycles and a
//! daily overdue-task auto-closer.

pub mod clock;
pub mod closer;
pub mod config;
pub mod error;
pub mod manager;
pub mod repository;
pub mod scheduler;
pub mod tracker;
pub mod validate;

pub use error::{Error, Result};
pub use tracker::{TaskBoard, Tracker};
