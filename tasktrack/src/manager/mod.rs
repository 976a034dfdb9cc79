//! Validated create/read/update/delete for projects and tasks.
//!
//! [`EntityManager`] holds the lifecycle rules every entity shares: count
//! limits, title and description validation, sibling-title uniqueness with
//! skip-current on edit, and typed not-found errors. An [`EntityPolicy`]
//! supplies what differs per kind: how siblings are loaded, how an entity is
//! built and changed, and how it is written to the [`Repository`].
//!
//! Managers do not lock anything themselves. Callers pass the repository
//! they already hold the [`SharedRepository`](crate::repository::SharedRepository)
//! lock for, so a whole validate-then-persist cycle is atomic.

pub mod project;
pub mod task;

use std::sync::Arc;

use tasktrack_model::{Detail, Entity, EntityKind};
use tracing::debug;

use crate::clock::Clock;
use crate::config::{KindLimits, Limits};
use crate::error::{Error, Result};
use crate::repository::{Repository, RepositoryError};
use crate::validate;

pub use project::{ProjectManager, ProjectPolicy};
pub use task::{TaskChanges, TaskDraft, TaskManager, TaskPolicy};

/// Per-kind behaviour plugged into [`EntityManager`].
pub trait EntityPolicy {
    /// The entity type managed.
    type Entity: Entity + Clone;
    /// Which collection the manager operates on (the owning project for
    /// tasks, nothing for projects).
    type Scope;
    /// Kind-specific input required at creation.
    type Draft;
    /// Kind-specific input accepted on update; `Default` changes nothing.
    type Changes: Default;

    /// Loads the collection the new or edited entity belongs to.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the store fails.
    fn load<R: Repository + ?Sized>(
        repo: &R,
        scope: &Self::Scope,
    ) -> Result<Vec<Self::Entity>, RepositoryError>;

    /// Builds a new entity from a validated detail and the draft.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] if the draft is invalid.
    fn build(detail: Detail, draft: Self::Draft, clock: &dyn Clock) -> Result<Self::Entity>;

    /// Produces the edited entity from its current state.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] if the changes are invalid.
    fn apply(
        current: &Self::Entity,
        detail: Detail,
        changes: Self::Changes,
        clock: &dyn Clock,
    ) -> Result<Self::Entity>;

    /// Appends a new entity to the scope's collection.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the write fails.
    fn append<R: Repository + ?Sized>(
        repo: &mut R,
        scope: &Self::Scope,
        entity: Self::Entity,
    ) -> Result<(), RepositoryError>;

    /// Replaces the stored entity with the same id.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if it is gone or the write fails.
    fn replace<R: Repository + ?Sized>(
        repo: &mut R,
        scope: &Self::Scope,
        entity: &Self::Entity,
    ) -> Result<(), RepositoryError>;

    /// Removes an entity and everything it owns, returning how many owned
    /// entities went with it.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if it is gone or the write fails.
    fn remove<R: Repository + ?Sized>(
        repo: &mut R,
        scope: &Self::Scope,
        id: &<Self::Entity as Entity>::Id,
    ) -> Result<usize, RepositoryError>;
}

/// Generic lifecycle engine for one entity collection.
pub struct EntityManager<P: EntityPolicy> {
    scope: P::Scope,
    limits: KindLimits,
    clock: Arc<dyn Clock>,
}

impl<P: EntityPolicy> EntityManager<P> {
    const KIND: EntityKind = <P::Entity as Entity>::KIND;

    /// Creates a manager over the collection identified by `scope`.
    pub fn new(scope: P::Scope, limits: &Limits, clock: Arc<dyn Clock>) -> Self {
        Self {
            scope,
            limits: limits.for_kind(Self::KIND),
            clock,
        }
    }

    /// Returns the collection this manager operates on.
    pub const fn scope(&self) -> &P::Scope {
        &self.scope
    }

    /// Returns the limits in force for this kind.
    pub const fn limits(&self) -> KindLimits {
        self.limits
    }

    /// Lists the collection in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store fails.
    pub fn list<R: Repository + ?Sized>(&self, repo: &R) -> Result<Vec<P::Entity>> {
        Ok(P::load(repo, &self.scope)?)
    }

    /// Returns the entity at `index` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `index` is out of range.
    pub fn get_by_index<R: Repository + ?Sized>(&self, repo: &R, index: usize) -> Result<P::Entity> {
        self.list(repo)?
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::not_found(Self::KIND, format!("#{index}")))
    }

    /// Returns the stored version of `entity`, looked up by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if it is not in the collection.
    pub fn get_by_identity<R: Repository + ?Sized>(
        &self,
        repo: &R,
        entity: &P::Entity,
    ) -> Result<P::Entity> {
        Self::find(&self.list(repo)?, entity.id())
    }

    /// Validates and stores a new entity.
    ///
    /// Checks run in order: collection limit, title, description, then the
    /// kind-specific draft. Nothing is written unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`], a validation error, or
    /// [`Error::NotFound`] if the scope is gone.
    pub fn create<R: Repository + ?Sized>(
        &self,
        repo: &mut R,
        detail: &Detail,
        draft: P::Draft,
    ) -> Result<P::Entity> {
        let siblings = P::load(repo, &self.scope)?;
        validate::max_count(siblings.len(), self.limits.max_count, Self::KIND)?;

        let detail = self.validate_detail(detail, &siblings, None)?;
        let entity = P::build(detail, draft, self.clock.as_ref())?;
        P::append(repo, &self.scope, entity.clone())?;

        debug!(kind = %Self::KIND, id = %entity.id(), "entity created");
        Ok(entity)
    }

    /// Validates and applies an edit to `existing`.
    ///
    /// `detail` replaces the current detail wholesale when given; `None`
    /// keeps it. Uniqueness is checked against siblings other than the
    /// entity's own stored title.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `existing` is gone, or a validation
    /// error.
    pub fn update<R: Repository + ?Sized>(
        &self,
        repo: &mut R,
        existing: &P::Entity,
        detail: Option<&Detail>,
        changes: P::Changes,
    ) -> Result<P::Entity> {
        let siblings = P::load(repo, &self.scope)?;
        let current = Self::find(&siblings, existing.id())?;

        let detail = match detail {
            Some(detail) => {
                self.validate_detail(detail, &siblings, Some(current.detail().title()))?
            }
            None => current.detail().clone(),
        };
        let updated = P::apply(&current, detail, changes, self.clock.as_ref())?;
        P::replace(repo, &self.scope, &updated)?;

        debug!(kind = %Self::KIND, id = %updated.id(), "entity updated");
        Ok(updated)
    }

    /// Removes `existing` and everything it owns.
    ///
    /// Returns the number of owned entities removed along with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `existing` is not in the collection.
    pub fn remove<R: Repository + ?Sized>(&self, repo: &mut R, existing: &P::Entity) -> Result<usize> {
        let siblings = P::load(repo, &self.scope)?;
        let current = Self::find(&siblings, existing.id())?;
        let cascaded = P::remove(repo, &self.scope, current.id())?;

        debug!(kind = %Self::KIND, id = %current.id(), cascaded, "entity removed");
        Ok(cascaded)
    }

    fn validate_detail(
        &self,
        detail: &Detail,
        siblings: &[P::Entity],
        skip_current: Option<&str>,
    ) -> Result<Detail> {
        let title = validate::non_empty_text(
            detail.title(),
            self.limits.max_title_len,
            &format!("{} title", Self::KIND),
            siblings.iter().map(|s| s.detail().title()),
            skip_current,
        )?;
        let description = validate::non_empty_text(
            detail.description(),
            self.limits.max_desc_len,
            &format!("{} description", Self::KIND),
            [],
            None,
        )?;
        Ok(Detail::new(title, description))
    }

    fn find(entities: &[P::Entity], id: &<P::Entity as Entity>::Id) -> Result<P::Entity> {
        entities
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| Error::not_found(Self::KIND, id))
    }
}
