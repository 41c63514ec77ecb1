//! Storage backends and the list cache.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            ListStorageProvider               │
//! │   (lazy Vec<T> cache, identity dedup)        │
//! └──────────────────────┬───────────────────────┘
//!                        │ Store
//!          ┌─────────────┴──────────────┐
//!          ↓                            ↓
//! ┌──────────────────┐        ┌──────────────────┐
//! │  JsonProvider    │        │  InMemoryStore   │
//! │ (whole-file JSON)│        │   (Vec, tests)   │
//! └───┬──────────┬───┘        └──────────────────┘
//!     │          │
//!  FileSystem   Codec
//! ```

mod cache;
mod codec;
mod file;
mod json;
mod memory;
mod traits;

pub use cache::{CachePolicy, ListStorageProvider};
pub use codec::{Codec, CodecError, JsonCodec};
pub use file::{FileSystem, InMemoryFileSystem, StdFileSystem};
pub use json::JsonProvider;
pub use memory::InMemoryStore;
pub use traits::Store;

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::entity::HasIdentity;
use crate::error::StoreError;

/// Configuration for a file-backed list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Write indented JSON instead of a single line.
    pub pretty: bool,
    /// How the cache reacts to a failed store write.
    pub cache_policy: CachePolicy,
}

impl StorageConfig {
    /// Checks that `path` can name the backing file.
    ///
    /// # Errors
    /// `InvalidConfig` if the path is empty or is an existing directory.
    pub fn validate(self, path: &Path) -> Result<Self, StoreError> {
        if path.as_os_str().is_empty() {
            return Err(StoreError::invalid_config("storage path must not be empty"));
        }

        if path.is_dir() {
            return Err(StoreError::invalid_config(format!(
                "storage path {} is a directory",
                path.display()
            )));
        }

        Ok(self)
    }
}

/// Open a cached, JSON-file-backed list at the given path.
///
/// Nothing is read until the first operation on the returned provider; a
/// missing file is created on the first successful mutation.
///
/// # Errors
/// `InvalidConfig` if the path is rejected by [`StorageConfig::validate`].
///
/// # Example
/// ```rust,no_run
/// use entity_store::storage::open_list;
/// use entity_store::Entity;
///
/// let mut list = open_list::<Entity>("./entities.json", None)?;
/// list.add(Entity::new())?;
/// # Ok::<(), entity_store::StoreError>(())
/// ```
pub fn open_list<T>(
    path: impl AsRef<Path>,
    config: Option<StorageConfig>,
) -> Result<ListStorageProvider<T, JsonProvider<T>>, StoreError>
where
    T: HasIdentity + Clone + Serialize + DeserializeOwned,
{
    let path = path.as_ref();
    let cfg = config.unwrap_or_default().validate(path)?;
    let codec = if cfg.pretty {
        JsonCodec::pretty()
    } else {
        JsonCodec::compact()
    };
    let provider = JsonProvider::with_capabilities(path, StdFileSystem, codec);
    Ok(ListStorageProvider::with_policy(provider, cfg.cache_policy))
}
