//! Lazily loaded in-memory cache over a [`Store`].
//!
//! [`ListStorageProvider`] is what callers use. The first public call reads
//! the whole collection from the store; after that every add/remove edits
//! the cached vector and forwards the same mutation to the store, so the
//! two stay identical after each successful call.
//!
//! # State machine
//!
//! ```text
//!   Unloaded ──(first add/remove/read, store.read() ok)──▶ Loaded
//! ```
//!
//! There is no transition back. A failed initial read leaves the cache
//! `Unloaded` so the next call retries the load.

use tracing::{debug, trace, warn};

use crate::entity::{position_of, HasIdentity};
use crate::error::StoreError;
use crate::storage::traits::Store;

/// What to do with the cache when the store rejects a mutation that was
/// already applied in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Undo the in-memory mutation and return the store error.
    #[default]
    Rollback,
    /// Keep the in-memory mutation and return
    /// [`StoreError::InconsistentCache`].
    AcceptDivergence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheState {
    Unloaded,
    Loaded,
}

/// Identity-deduplicated cache mirrored to a backing [`Store`].
///
/// Mutating methods take `&mut self`: one provider has exclusive access to
/// its cache, and the backing store is assumed to belong to it alone.
///
/// # Examples
///
/// ```
/// use entity_store::{InMemoryStore, ListStorageProvider, Record};
///
/// let mut list = ListStorageProvider::new(InMemoryStore::new());
/// list.add(Record::new(1))?;
/// list.add(Record::new(1))?;
/// assert_eq!(list.read()?.len(), 1);
/// # Ok::<(), entity_store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct ListStorageProvider<T, S> {
    state: CacheState,
    items: Vec<T>,
    store: S,
    policy: CachePolicy,
}

impl<T, S> ListStorageProvider<T, S>
where
    T: HasIdentity + Clone,
    S: Store<T>,
{
    /// Creates an unloaded cache over `store` with [`CachePolicy::Rollback`].
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_policy(store, CachePolicy::default())
    }

    /// Creates an unloaded cache with an explicit failure policy.
    #[must_use]
    pub fn with_policy(store: S, policy: CachePolicy) -> Self {
        Self {
            state: CacheState::Unloaded,
            items: Vec::new(),
            store,
            policy,
        }
    }

    fn ensure_loaded(&mut self) -> Result<&mut Vec<T>, StoreError> {
        if self.state == CacheState::Unloaded {
            self.items = self.store.read()?;
            self.state = CacheState::Loaded;
            debug!(items = self.items.len(), "loaded collection into cache");
        }
        Ok(&mut self.items)
    }

    /// Adds `item` unless an entry with the same identity is already cached.
    ///
    /// # Errors
    /// Propagates the store error. Under [`CachePolicy::Rollback`] the cache
    /// is restored first; under [`CachePolicy::AcceptDivergence`] the cache
    /// keeps `item` and the error is wrapped in `InconsistentCache`.
    pub fn add(&mut self, item: T) -> Result<(), StoreError> {
        let policy = self.policy;
        let items = self.ensure_loaded()?;
        if position_of(items, &item).is_some() {
            trace!(id = ?item.id(), "add skipped: identity already cached");
            return Ok(());
        }

        items.push(item.clone());
        let id = item.id().clone();
        let Err(err) = self.store.add(item) else {
            debug!(id = ?id, "added to store");
            return Ok(());
        };

        match policy {
            CachePolicy::Rollback => {
                warn!(id = ?id, error = %err, "store add failed; rolling back cache");
                self.items.pop();
                Err(err)
            }
            CachePolicy::AcceptDivergence => {
                warn!(id = ?id, error = %err, "store add failed; cache diverged");
                Err(StoreError::InconsistentCache {
                    source: Box::new(err),
                })
            }
        }
    }

    /// Removes the entry with the same identity as `item`, if cached.
    ///
    /// # Errors
    /// Same policy handling as [`add`](Self::add).
    pub fn remove(&mut self, item: &T) -> Result<(), StoreError> {
        let policy = self.policy;
        let items = self.ensure_loaded()?;
        let Some(idx) = position_of(items, item) else {
            trace!(id = ?item.id(), "remove skipped: identity not cached");
            return Ok(());
        };

        let removed = items.remove(idx);
        let Err(err) = self.store.remove(item) else {
            debug!(id = ?item.id(), "removed from store");
            return Ok(());
        };

        match policy {
            CachePolicy::Rollback => {
                warn!(id = ?item.id(), error = %err, "store remove failed; rolling back cache");
                self.items.insert(idx, removed);
                Err(err)
            }
            CachePolicy::AcceptDivergence => {
                warn!(id = ?item.id(), error = %err, "store remove failed; cache diverged");
                Err(StoreError::InconsistentCache {
                    source: Box::new(err),
                })
            }
        }
    }

    /// Returns the cached collection in insertion order.
    ///
    /// # Errors
    /// Propagates a failed initial load.
    pub fn read(&mut self) -> Result<&[T], StoreError> {
        Ok(self.ensure_loaded()?.as_slice())
    }

    /// Returns true if an entry with the same identity as `item` is cached.
    ///
    /// # Errors
    /// Propagates a failed initial load.
    pub fn contains(&mut self, item: &T) -> Result<bool, StoreError> {
        Ok(position_of(self.ensure_loaded()?, item).is_some())
    }

    /// Number of cached entries.
    ///
    /// # Errors
    /// Propagates a failed initial load.
    pub fn len(&mut self) -> Result<usize, StoreError> {
        Ok(self.ensure_loaded()?.len())
    }

    /// Returns true if the collection is empty.
    ///
    /// # Errors
    /// Propagates a failed initial load.
    pub fn is_empty(&mut self) -> Result<bool, StoreError> {
        Ok(self.ensure_loaded()?.is_empty())
    }
}

impl<T, S> ListStorageProvider<T, S> {
    /// Returns true once the collection has been read from the store.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, CacheState::Loaded)
    }

    /// Returns the configured failure policy.
    #[must_use]
    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Drops the cache and returns the backing store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
