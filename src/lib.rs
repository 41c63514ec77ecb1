//! # entity-store
//!
//! Keeps a uniquely identified collection of records in memory and mirrors
//! every mutation to a durable backing store, by default a single JSON file
//! holding an array.
//!
//! ## Core Concepts
//!
//! - **Identity**: every stored value exposes a key through [`HasIdentity`];
//!   equal keys mean the same record
//! - **Store**: the add / remove / read-all contract any backend satisfies
//! - **JsonProvider**: a [`Store`] that rewrites one JSON file per mutation
//! - **ListStorageProvider**: the lazily loaded cache callers actually use
//!
//! ## Usage
//!
//! ```rust,no_run
//! use entity_store::{Entity, ListStorageProvider, JsonProvider};
//!
//! let mut list = ListStorageProvider::new(JsonProvider::<Entity>::new("entities.json"));
//! let entity = Entity::new();
//! list.add(entity)?;
//! assert!(list.contains(&entity)?);
//! list.remove(&entity)?;
//! # Ok::<(), entity_store::StoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod entity;
pub mod error;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use entity::{contains_identity, position_of, Entity, EntityId, HasIdentity, HasTimestamp, Record};
pub use error::{StoreError, StoreResult};
pub use storage::{
    open_list, CachePolicy, Codec, CodecError, FileSystem, InMemoryFileSystem, InMemoryStore,
    JsonCodec, JsonProvider, ListStorageProvider, StdFileSystem, StorageConfig, Store,
};
