//! Single-file JSON store.
//!
//! The whole collection lives in one file as a JSON array. Every mutation
//! reads the array, edits it, and rewrites the entire file, so the file is
//! a single well-formed document at every point in time. Mutations cost
//! O(n) in the size of the collection; that is accepted in exchange for
//! never needing compaction or log replay.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::entity::{position_of, HasIdentity};
use crate::error::StoreError;
use crate::storage::codec::{Codec, JsonCodec};
use crate::storage::file::{FileSystem, StdFileSystem};
use crate::storage::traits::Store;

/// [`Store`] over one JSON file.
///
/// An absent or empty file reads as an empty collection.
///
/// # Example
/// ```rust,no_run
/// use entity_store::{Entity, JsonProvider, Store};
///
/// let provider = JsonProvider::<Entity>::new("./entities.json");
/// provider.add(Entity::new())?;
/// assert_eq!(provider.read()?.len(), 1);
/// # Ok::<(), entity_store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct JsonProvider<T, F = StdFileSystem, C = JsonCodec> {
    path: PathBuf,
    fs: F,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonProvider<T> {
    /// Store backed by the real file at `path`, compact JSON.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capabilities(path, StdFileSystem, JsonCodec::compact())
    }
}

impl<T, F, C> JsonProvider<T, F, C> {
    /// Store with explicit file and codec implementations.
    #[must_use]
    pub fn with_capabilities(path: impl Into<PathBuf>, fs: F, codec: C) -> Self {
        Self {
            path: path.into(),
            fs,
            codec,
            _marker: PhantomData,
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file system capability.
    #[must_use]
    pub fn file_system(&self) -> &F {
        &self.fs
    }
}

impl<T, F, C> JsonProvider<T, F, C>
where
    T: Serialize + DeserializeOwned,
    F: FileSystem,
    C: Codec,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let text = match self.fs.read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            // The file was read but is not UTF-8 text.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(StoreError::Deserialization {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.codec
            .decode(&text)
            .map_err(|e| StoreError::Deserialization {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let text = self
            .codec
            .encode(items)
            .map_err(|e| StoreError::Serialization {
                message: e.to_string(),
            })?;

        self.fs
            .write(&self.path, &text)
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            items = items.len(),
            bytes = text.len(),
            "rewrote collection file"
        );
        Ok(())
    }
}

impl<T, F, C> Store<T> for JsonProvider<T, F, C>
where
    T: HasIdentity + Serialize + DeserializeOwned,
    F: FileSystem,
    C: Codec,
{
    fn add(&self, item: T) -> Result<(), StoreError> {
        let mut items = self.load()?;
        match position_of(&items, &item) {
            Some(idx) => items[idx] = item,
            None => items.push(item),
        }
        self.save(&items)
    }

    fn remove(&self, item: &T) -> Result<(), StoreError> {
        let mut items = self.load()?;
        if let Some(idx) = position_of(&items, item) {
            items.remove(idx);
        }
        self.save(&items)
    }

    fn read(&self) -> Result<Vec<T>, StoreError> {
        self.load()
    }
}
