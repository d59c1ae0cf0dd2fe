//! Repository Contract
//!
//! The five-method persistence interface every entity type plugs into.
//!
//! Soft delete: `delete` marks a row invisible to every later find instead of
//! removing it. `update` and `delete` on a missing or already-deleted id fail
//! with `NotFound`. `find_by_id` answers `None` for the same ids.

pub mod memory;

use crate::error::app_error::AppError;
use crate::error::app_error::AppResult;
use crate::id::Id;
use crate::pagination::PageWindow;

pub use memory::InMemoryRepository;

/// Listing order used by `find_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Ascending id (insertion order)
    OldestFirst,
    /// Descending creation time
    NewestFirst,
}

/// A persisted record with a typed integer key
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in log fields and NotFound messages
    const NAME: &'static str;

    const LIST_ORDER: ListOrder = ListOrder::OldestFirst;

    fn id(&self) -> Id<Self>;

    fn set_id(&mut self, id: Id<Self>);
}

/// Generic repository
#[trait_variant::make(Repository: Send)]
pub trait LocalRepository<E: Entity> {
    /// Persist a new entity and return it with its assigned id
    async fn create(&self, entity: E) -> AppResult<E>;

    /// Overwrite a live entity
    async fn update(&self, entity: &E) -> AppResult<()>;

    /// Soft-delete a live entity
    async fn delete(&self, id: Id<E>) -> AppResult<()>;

    async fn find_by_id(&self, id: Id<E>) -> AppResult<Option<E>>;

    /// One page of live entities plus the live total
    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<E>, i64)>;
}

/// `NotFound` for an entity id, e.g. "device 7 not found"
pub fn not_found<E: Entity>(id: Id<E>) -> AppError {
    AppError::not_found(format!("{} {} not found", E::NAME, id))
}
