//! In-memory storage backend.
//!
//! A thread-safe [`Store`] over a plain vector. It is intended for embedded
//! usage, tests, and as a reference implementation of the contract.

use std::sync::RwLock;

use crate::entity::{position_of, HasIdentity};
use crate::error::StoreError;
use crate::storage::traits::Store;

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend(format!("poisoned lock: {context}"))
}

/// Thread-safe in-memory store.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    items: RwLock<Vec<T>>,
}

impl<T> InMemoryStore<T> {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store pre-populated with `items`.
    ///
    /// The caller is responsible for the items having distinct identities.
    #[must_use]
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> for InMemoryStore<T>
where
    T: HasIdentity + Clone + Send + Sync,
{
    fn add(&self, item: T) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| lock_err("memory.add"))?;
        match position_of(&items, &item) {
            Some(idx) => items[idx] = item,
            None => items.push(item),
        }
        Ok(())
    }

    fn remove(&self, item: &T) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| lock_err("memory.remove"))?;
        if let Some(idx) = position_of(&items, item) {
            items.remove(idx);
        }
        Ok(())
    }

    fn read(&self) -> Result<Vec<T>, StoreError> {
        let items = self.items.read().map_err(|_| lock_err("memory.read"))?;
        Ok(items.clone())
    }
}
