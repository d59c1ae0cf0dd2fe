//! In-process repository
//!
//! A [`Repository`] backed by a `BTreeMap`, with the same soft-delete and
//! paging semantics as the Postgres implementations. Used by the crates'
//! tests and handy for running the HTTP layer without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{Entity, ListOrder, Repository, not_found};
use crate::error::app_error::{AppError, AppResult};
use crate::id::Id;
use crate::pagination::{PageWindow, fetch_page};

struct Row<E> {
    entity: E,
    deleted: bool,
}

struct Store<E> {
    next_id: i64,
    rows: BTreeMap<i64, Row<E>>,
}

/// Shared in-memory table; clones point at the same rows
pub struct InMemoryRepository<E> {
    store: Arc<Mutex<Store<E>>>,
}

impl<E> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store {
                next_id: 1,
                rows: BTreeMap::new(),
            })),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless a live row matches `clashes`; a clash is a `Conflict`
    pub async fn create_unless(
        &self,
        mut entity: E,
        clashes: impl Fn(&E, &E) -> bool,
    ) -> AppResult<E> {
        let mut store = self.store.lock().await;

        let taken = store
            .rows
            .values()
            .any(|row| !row.deleted && clashes(&row.entity, &entity));
        if taken {
            return Err(AppError::conflict(format!("{} already exists", E::NAME)));
        }

        let id = store.next_id;
        store.next_id += 1;
        entity.set_id(Id::from_raw(id));
        store.rows.insert(
            id,
            Row {
                entity: entity.clone(),
                deleted: false,
            },
        );
        Ok(entity)
    }

    /// First live row matching `predicate`
    pub async fn find_first(&self, predicate: impl Fn(&E) -> bool) -> Option<E> {
        let store = self.store.lock().await;
        store
            .rows
            .values()
            .find(|row| !row.deleted && predicate(&row.entity))
            .map(|row| row.entity.clone())
    }

    /// Whether the row exists but has been soft-deleted
    pub async fn is_soft_deleted(&self, id: Id<E>) -> bool {
        let store = self.store.lock().await;
        store
            .rows
            .get(&id.value())
            .is_some_and(|row| row.deleted)
    }

    async fn live_total(&self) -> i64 {
        let store = self.store.lock().await;
        store.rows.values().filter(|row| !row.deleted).count() as i64
    }

    async fn live_slice(&self, window: PageWindow) -> Vec<E> {
        let store = self.store.lock().await;
        let live = store.rows.values().filter(|row| !row.deleted);
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(0);

        match E::LIST_ORDER {
            ListOrder::OldestFirst => live
                .skip(offset)
                .take(limit)
                .map(|row| row.entity.clone())
                .collect(),
            ListOrder::NewestFirst => live
                .rev()
                .skip(offset)
                .take(limit)
                .map(|row| row.entity.clone())
                .collect(),
        }
    }
}

impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn create(&self, entity: E) -> AppResult<E> {
        self.create_unless(entity, |_, _| false).await
    }

    async fn update(&self, entity: &E) -> AppResult<()> {
        let mut store = self.store.lock().await;
        match store.rows.get_mut(&entity.id().value()) {
            Some(row) if !row.deleted => {
                row.entity = entity.clone();
                Ok(())
            }
            _ => Err(not_found(entity.id())),
        }
    }

    async fn delete(&self, id: Id<E>) -> AppResult<()> {
        let mut store = self.store.lock().await;
        match store.rows.get_mut(&id.value()) {
            Some(row) if !row.deleted => {
                row.deleted = true;
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }

    async fn find_by_id(&self, id: Id<E>) -> AppResult<Option<E>> {
        let store = self.store.lock().await;
        Ok(store
            .rows
            .get(&id.value())
            .filter(|row| !row.deleted)
            .map(|row| row.entity.clone()))
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<E>, i64)> {
        let total = self.live_total().await;
        fetch_page(total, || async { Ok(self.live_slice(window).await) }).await
    }
}
