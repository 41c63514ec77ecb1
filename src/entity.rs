//! Entity identity and equality.
//!
//! Every stored value exposes a comparable identity key through
//! [`HasIdentity`]. Two values with equal keys are the same record, no
//! matter what else differs; that is the only criterion the cache and
//! the stores use for containment and deduplication.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A value that can be stored in an identity-deduplicated collection.
pub trait HasIdentity {
    /// The identity key type.
    type Key: Eq + Clone + fmt::Debug;

    /// Returns the identity key of this value.
    fn id(&self) -> &Self::Key;

    /// Returns true if both values carry the same identity key.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// A value that also carries a comparable timestamp.
pub trait HasTimestamp {
    /// The timestamp type.
    type Timestamp: Ord + Copy + fmt::Debug;

    /// Returns the timestamp of this value.
    fn timestamp(&self) -> Self::Timestamp;
}

/// Returns the index of the first element with the same identity as `item`.
pub fn position_of<T: HasIdentity>(items: &[T], item: &T) -> Option<usize> {
    items.iter().position(|x| x.same_identity(item))
}

/// Returns true if `items` holds an element with the same identity as `item`.
pub fn contains_identity<T: HasIdentity>(items: &[T], item: &T) -> bool {
    position_of(items, item).is_some()
}

/// Globally unique, stable entity identifier.
///
/// # Examples
///
/// ```
/// use entity_store::EntityId;
///
/// let id = EntityId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Creates a new random entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entity ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A timestamped record: identity plus the time it was written, in Unix
/// milliseconds.
///
/// Full equality requires both fields to match. Collections still
/// deduplicate on `id` alone through [`HasIdentity`].
///
/// # Examples
///
/// ```
/// use entity_store::{Entity, HasIdentity};
///
/// let a = Entity::new();
/// let b = Entity::with_id(a.id, a.timestamp + 1);
/// assert!(a.same_identity(&b));
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Entity {
    /// Globally unique identifier
    pub id: EntityId,

    /// Unix milliseconds
    pub timestamp: i64,
}

impl Entity {
    /// Creates an entity with a fresh ID stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(Self::new_id(), Utc::now().timestamp_millis())
    }

    /// Creates an entity from explicit parts.
    #[must_use]
    pub const fn with_id(id: EntityId, timestamp: i64) -> Self {
        Self { id, timestamp }
    }

    /// Generates a new random ID.
    #[must_use]
    pub fn new_id() -> EntityId {
        EntityId::new()
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl HasIdentity for Entity {
    type Key = EntityId;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl HasTimestamp for Entity {
    type Timestamp = i64;

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other) && self.timestamp == other.timestamp
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.timestamp.hash(state);
    }
}

/// The smallest storable record: an identity key and nothing else.
///
/// Equality is identity equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record<K> {
    /// Identity key
    pub id: K,
}

impl<K> Record<K> {
    /// Creates a record with the given key.
    pub const fn new(id: K) -> Self {
        Self { id }
    }
}

impl<K: Eq + Clone + fmt::Debug> HasIdentity for Record<K> {
    type Key = K;

    fn id(&self) -> &K {
        &self.id
    }
}
