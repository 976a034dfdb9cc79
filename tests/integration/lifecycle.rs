//! Integration tests for project and task lifecycles through the `Tracker`
//! facade: limits, uniqueness, cascading delete, partial updates and
//! atomicity when the store fails.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::similar_names)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tasktrack::clock::{Clock, ManualClock};
use tasktrack::config::Limits;
use tasktrack::manager::{TaskChanges, TaskDraft};
use tasktrack::repository::{InMemoryRepository, Repository, RepositoryError, shared};
use tasktrack::{Error, Tracker};
use tasktrack_model::{Detail, EntityKind, Project, ProjectId, Task, TaskId, TaskStatus};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

const TODAY: &str = "2026-05-10";
const TOMORROW: &str = "2026-05-11";

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap(),
    ))
}

fn tracker_with(limits: Limits) -> Tracker<InMemoryRepository> {
    Tracker::new(shared(InMemoryRepository::new()), limits, clock())
}

fn tracker() -> Tracker<InMemoryRepository> {
    tracker_with(Limits::default())
}

fn detail(title: &str) -> Detail {
    Detail::new(title, "description")
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

#[test]
fn fourth_task_exceeds_limit_of_three() {
    let tracker = tracker_with(Limits {
        max_tasks: 3,
        max_task_title_len: 10,
        ..Limits::default()
    });
    let project = tracker.create_project(&detail("P1")).unwrap();
    let board = tracker.tasks(&project);

    for title in ["T1", "T2", "T3"] {
        board
            .create_task(&detail(title), TaskDraft::new(TOMORROW))
            .unwrap();
    }
    let err = board
        .create_task(&detail("T4"), TaskDraft::new(TOMORROW))
        .unwrap_err();

    assert_eq!(
        err,
        Error::LimitExceeded {
            kind: EntityKind::Task,
            max: 3
        }
    );
    assert_eq!(board.list_tasks().unwrap().len(), 3);
}

#[test]
fn create_grows_collection_by_exactly_one() {
    let tracker = tracker_with(Limits {
        max_projects: 2,
        ..Limits::default()
    });

    tracker.create_project(&detail("A")).unwrap();
    assert_eq!(tracker.list_projects().unwrap().len(), 1);
    tracker.create_project(&detail("B")).unwrap();
    assert_eq!(tracker.list_projects().unwrap().len(), 2);

    assert!(matches!(
        tracker.create_project(&detail("C")),
        Err(Error::LimitExceeded {
            kind: EntityKind::Project,
            max: 2
        })
    ));
    assert_eq!(tracker.list_projects().unwrap().len(), 2);
}

#[test]
fn task_title_length_uses_task_limit() {
    let tracker = tracker_with(Limits {
        max_task_title_len: 10,
        ..Limits::default()
    });
    let project = tracker.create_project(&detail("A project title")).unwrap();
    let board = tracker.tasks(&project);

    let err = board
        .create_task(&detail("eleven char"), TaskDraft::new(TOMORROW))
        .unwrap_err();
    assert_eq!(
        err,
        Error::MaxLength {
            field: "task title".to_string(),
            max: 10,
            len: 11
        }
    );
}

// ---------------------------------------------------------------------------
// Uniqueness and empty values
// ---------------------------------------------------------------------------

#[test]
fn duplicate_project_title_is_exact_after_trim() {
    let tracker = tracker();
    tracker.create_project(&detail("Home")).unwrap();

    assert!(matches!(
        tracker.create_project(&detail("  Home ")),
        Err(Error::DuplicateValue { .. })
    ));
    assert!(tracker.create_project(&detail("home")).is_ok());
}

#[test]
fn task_titles_are_unique_per_project_only() {
    let tracker = tracker();
    let a = tracker.create_project(&detail("A")).unwrap();
    let b = tracker.create_project(&detail("B")).unwrap();

    tracker
        .tasks(&a)
        .create_task(&detail("Shared"), TaskDraft::new(TOMORROW))
        .unwrap();
    assert!(
        tracker
            .tasks(&b)
            .create_task(&detail("Shared"), TaskDraft::new(TOMORROW))
            .is_ok()
    );
    assert!(matches!(
        tracker
            .tasks(&a)
            .create_task(&detail("Shared"), TaskDraft::new(TOMORROW)),
        Err(Error::DuplicateValue { .. })
    ));
}

#[test]
fn blank_description_is_rejected() {
    let tracker = tracker();
    let err = tracker
        .create_project(&Detail::new("Garden", "   "))
        .unwrap_err();
    assert_eq!(
        err,
        Error::EmptyValue {
            field: "project description".to_string()
        }
    );
    assert!(tracker.list_projects().unwrap().is_empty());
}

#[test]
fn update_with_own_title_never_duplicates() {
    let tracker = tracker();
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);
    let task = board
        .create_task(&detail("Dig"), TaskDraft::new(TOMORROW))
        .unwrap();

    let renamed = tracker
        .update_project(&project, &Detail::new("Garden", "new words"))
        .unwrap();
    assert_eq!(renamed.detail.description(), "new words");

    let edited = board
        .update_task(
            &task,
            Some(&Detail::new(" Dig ", "deeper")),
            TaskChanges::default(),
        )
        .unwrap();
    assert_eq!(edited.detail, Detail::new("Dig", "deeper"));
}

// ---------------------------------------------------------------------------
// Cascading delete
// ---------------------------------------------------------------------------

#[test]
fn deleting_project_removes_its_tasks() {
    let tracker = tracker();
    let p1 = tracker.create_project(&detail("P1")).unwrap();
    let p2 = tracker.create_project(&detail("P2")).unwrap();
    tracker
        .tasks(&p1)
        .create_task(&detail("T1"), TaskDraft::new(TOMORROW))
        .unwrap();
    tracker
        .tasks(&p2)
        .create_task(&detail("T2"), TaskDraft::new(TOMORROW))
        .unwrap();

    assert_eq!(tracker.delete_project(&p1).unwrap(), 1);

    let projects = tracker.list_projects().unwrap();
    assert_eq!(projects, vec![p2.clone()]);
    assert!(tracker.repository().lock().list_tasks(&p1.id).unwrap().is_empty());
    assert!(tracker.tasks(&p1).list_tasks().unwrap().is_empty());
    assert_eq!(tracker.repository().lock().task_count(), 1);
    assert!(matches!(
        tracker
            .tasks(&p1)
            .create_task(&detail("T9"), TaskDraft::new(TOMORROW)),
        Err(Error::NotFound {
            kind: EntityKind::Project,
            ..
        })
    ));
}

#[test]
fn deleting_project_with_n_tasks_shrinks_task_total_by_n() {
    let tracker = tracker();
    let keep = tracker.create_project(&detail("Keep")).unwrap();
    tracker
        .tasks(&keep)
        .create_task(&detail("stay"), TaskDraft::new(TOMORROW))
        .unwrap();

    let doomed = tracker.create_project(&detail("Doomed")).unwrap();
    let board = tracker.tasks(&doomed);
    for i in 0..7 {
        board
            .create_task(&detail(&format!("t{i}")), TaskDraft::new(TODAY))
            .unwrap();
    }

    let before = tracker.repository().lock().task_count();
    let removed = tracker.delete_project(&doomed).unwrap();
    let after = tracker.repository().lock().task_count();

    assert_eq!(removed, 7);
    assert_eq!(before - after, 7);
}

#[test]
fn deleted_task_is_not_found_afterwards() {
    let tracker = tracker();
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);
    let task = board
        .create_task(&detail("Dig"), TaskDraft::new(TOMORROW))
        .unwrap();

    board.delete_task(&task).unwrap();
    assert!(matches!(
        board.find_task(&task),
        Err(Error::NotFound {
            kind: EntityKind::Task,
            ..
        })
    ));
    assert!(matches!(
        board.update_task(&task, None, TaskChanges::default().with_status("done")),
        Err(Error::NotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[test]
fn lookup_by_index_and_identity() {
    let tracker = tracker();
    let a = tracker.create_project(&detail("A")).unwrap();
    let b = tracker.create_project(&detail("B")).unwrap();

    assert_eq!(tracker.project(1).unwrap(), b);
    assert_eq!(tracker.find_project(&a).unwrap(), a);
    assert!(matches!(
        tracker.project(2),
        Err(Error::NotFound { ref key, .. }) if key == "#2"
    ));

    let board = tracker.tasks(&a);
    let t = board
        .create_task(&detail("first"), TaskDraft::new(TOMORROW))
        .unwrap();
    assert_eq!(board.task(0).unwrap(), t);
    assert_eq!(board.project_id(), &a.id);
}

// ---------------------------------------------------------------------------
// Partial task updates
// ---------------------------------------------------------------------------

#[test]
fn status_only_update_keeps_other_fields() {
    let clock = clock();
    let tracker = Tracker::new(
        shared(InMemoryRepository::new()),
        Limits::default(),
        clock.clone(),
    );
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);
    let task = board
        .create_task(&Detail::new("Dig", "north bed"), TaskDraft::new(TOMORROW))
        .unwrap();

    let done = board
        .update_task(&task, None, TaskChanges::default().with_status("done"))
        .unwrap();

    assert_eq!(done.detail, task.detail);
    assert_eq!(done.deadline, task.deadline);
    assert_eq!(done.status, TaskStatus::Done);
    assert_eq!(done.closed_at, Some(clock.now()));
    assert_eq!(board.find_task(&task).unwrap(), done);
}

#[test]
fn editing_done_task_keeps_close_time() {
    let clock = clock();
    let tracker = Tracker::new(
        shared(InMemoryRepository::new()),
        Limits::default(),
        clock.clone(),
    );
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);
    let task = board
        .create_task(&detail("Dig"), TaskDraft::new(TOMORROW).with_status("done"))
        .unwrap();
    let closed_at = task.closed_at;

    clock.advance(chrono::Duration::hours(2));
    let edited = board
        .update_task(
            &task,
            Some(&Detail::new("Dig", "renamed")),
            TaskChanges::default().with_status("done"),
        )
        .unwrap();
    assert_eq!(edited.closed_at, closed_at);

    let reopened = board
        .update_task(&edited, None, TaskChanges::default().with_status("doing"))
        .unwrap();
    assert!(reopened.closed_at.is_none());
}

#[test]
fn editing_after_deadline_passes_keeps_same_deadline() {
    let clock = clock();
    let tracker = Tracker::new(
        shared(InMemoryRepository::new()),
        Limits::default(),
        clock.clone(),
    );
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);
    let task = board
        .create_task(&detail("Dig"), TaskDraft::new(TODAY))
        .unwrap();

    clock.advance(chrono::Duration::days(3));
    let renamed = Detail::new("Dig", "south bed too");
    let edited = board
        .update_task(
            &task,
            Some(&renamed),
            TaskChanges::default().with_deadline(task.deadline.to_string()),
        )
        .unwrap();
    assert_eq!(edited.deadline, task.deadline);
    assert_eq!(edited.detail, renamed);

    let err = board
        .update_task(
            &edited,
            None,
            TaskChanges::default().with_deadline(TOMORROW),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidDate {
            reason: tasktrack::error::DateProblem::InPast,
            ..
        }
    ));
    assert_eq!(board.find_task(&task).unwrap(), edited);
}

#[test]
fn rejected_update_changes_nothing() {
    let tracker = tracker();
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);
    let task = board
        .create_task(&detail("Dig"), TaskDraft::new(TOMORROW))
        .unwrap();

    let err = board
        .update_task(
            &task,
            Some(&detail("Plant")),
            TaskChanges::default().with_deadline("2026-05-09"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDate { .. }));
    assert_eq!(board.find_task(&task).unwrap(), task);
}

// ---------------------------------------------------------------------------
// Atomicity when the store fails
// ---------------------------------------------------------------------------

/// Wraps the in-memory store and fails every task write.
#[derive(Default)]
struct FailingTaskWrites {
    inner: InMemoryRepository,
}

impl Repository for FailingTaskWrites {
    fn list_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        self.inner.list_projects()
    }

    fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>, RepositoryError> {
        self.inner.list_tasks(project)
    }

    fn append_project(&mut self, project: Project) -> Result<(), RepositoryError> {
        self.inner.append_project(project)
    }

    fn append_task(&mut self, _: &ProjectId, _: Task) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("disk full".to_string()))
    }

    fn remove_project(&mut self, project: &ProjectId) -> Result<Vec<Task>, RepositoryError> {
        self.inner.remove_project(project)
    }

    fn remove_task(&mut self, _: &ProjectId, _: &TaskId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("disk full".to_string()))
    }

    fn update_project(&mut self, project: &Project) -> Result<(), RepositoryError> {
        self.inner.update_project(project)
    }

    fn update_task(&mut self, _: &ProjectId, _: &Task) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("disk full".to_string()))
    }
}

#[test]
fn failed_persist_leaves_no_trace() {
    let tracker = Tracker::new(
        shared(FailingTaskWrites::default()),
        Limits::default(),
        clock(),
    );
    let project = tracker.create_project(&detail("Garden")).unwrap();
    let board = tracker.tasks(&project);

    let err = board
        .create_task(&detail("Dig"), TaskDraft::new(TOMORROW))
        .unwrap_err();

    assert_eq!(err, Error::Storage("disk full".to_string()));
    assert!(board.list_tasks().unwrap().is_empty());
}
