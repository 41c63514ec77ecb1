//! Abstract store contract.
//!
//! A [`Store`] persists a whole identity-deduplicated collection. Backends
//! range from a single JSON file to a plain in-memory vector; the list
//! cache only ever talks to this trait.

use std::sync::Arc;

use crate::entity::HasIdentity;
use crate::error::StoreError;

/// Storage contract for a collection of entities.
///
/// Every operation acts on the whole persisted collection and either
/// fully succeeds or leaves the previous durable state intact.
pub trait Store<T: HasIdentity>: Send + Sync {
    /// Persist `item`. An entry with the same identity is overwritten in
    /// place, never duplicated.
    fn add(&self, item: T) -> Result<(), StoreError>;

    /// Remove the entry with the same identity as `item`, if any.
    fn remove(&self, item: &T) -> Result<(), StoreError>;

    /// Read the full collection. Empty if nothing was ever stored.
    fn read(&self) -> Result<Vec<T>, StoreError>;
}

impl<T: HasIdentity, S: Store<T> + ?Sized> Store<T> for Arc<S> {
    fn add(&self, item: T) -> Result<(), StoreError> {
        (**self).add(item)
    }

    fn remove(&self, item: &T) -> Result<(), StoreError> {
        (**self).remove(item)
    }

    fn read(&self) -> Result<Vec<T>, StoreError> {
        (**self).read()
    }
}

impl<T: HasIdentity, S: Store<T> + ?Sized> Store<T> for Box<S> {
    fn add(&self, item: T) -> Result<(), StoreError> {
        (**self).add(item)
    }

    fn remove(&self, item: &T) -> Result<(), StoreError> {
        (**self).remove(item)
    }

    fn read(&self) -> Result<Vec<T>, StoreError> {
        (**self).read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Record;

    // Compile-time test: ensure the trait is object-safe
    fn _assert_store_object_safe(_: &dyn Store<Record<u32>>) {}

    #[test]
    fn test_boxed_dyn_store_forwards() {
        let store: Box<dyn Store<Record<u32>>> =
            Box::new(crate::storage::memory::InMemoryStore::new());
        store.add(Record::new(1)).unwrap();
        store.add(Record::new(1)).unwrap();
        assert_eq!(store.read().unwrap(), vec![Record::new(1)]);
        store.remove(&Record::new(1)).unwrap();
        assert!(store.read().unwrap().is_empty());
    }
}
