// ── Generic entity collection ──
//
// Keyed in-memory mirror of one entity type. Not a cache: nothing is
// evicted except by an explicit remove or a refresh prune.

use std::collections::{HashMap, HashSet};

use crate::model::{Camera, EntityId, Recording};

/// An entity with a server-assigned id.
pub trait Entity: Clone {
    /// Human-readable kind, used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &EntityId;
}

impl Entity for Camera {
    const KIND: &'static str = "camera";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Recording {
    const KIND: &'static str = "recording";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Lookup key: either a raw id or an entity of the collection's type.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a, T> {
    Id(&'a str),
    Entity(&'a T),
}

impl<T: Entity> EntityRef<'_, T> {
    fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Entity(entity) => entity.id().as_str(),
        }
    }
}

impl<'a, T> From<&'a str> for EntityRef<'a, T> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

impl<'a, T> From<&'a String> for EntityRef<'a, T> {
    fn from(id: &'a String) -> Self {
        Self::Id(id.as_str())
    }
}

impl<'a, T> From<&'a EntityId> for EntityRef<'a, T> {
    fn from(id: &'a EntityId) -> Self {
        Self::Id(id.as_str())
    }
}

impl<'a, T: Entity> From<&'a T> for EntityRef<'a, T> {
    fn from(entity: &'a T) -> Self {
        Self::Entity(entity)
    }
}

/// Homogeneous id → entity map. The element type is fixed by the generic
/// parameter, so a camera can never land in a recording collection.
#[derive(Debug, Clone)]
pub struct EntityCollection<T: Entity> {
    items: HashMap<EntityId, T>,
}

impl<T: Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityCollection<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Insert or replace by id. Returns the previous entry, if any.
    pub fn add(&mut self, entity: T) -> Option<T> {
        self.items.insert(entity.id().clone(), entity)
    }

    pub fn get<'a>(&self, key: impl Into<EntityRef<'a, T>>) -> Option<&T>
    where
        T: 'a,
    {
        let key = key.into();
        self.items.get(key.id())
    }

    pub fn contains<'a>(&self, key: impl Into<EntityRef<'a, T>>) -> bool
    where
        T: 'a,
    {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        self.items.remove(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// All ids, sorted for stable output.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.items.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop every entry whose id is not in `keep`. Returns how many went.
    pub(crate) fn retain_ids(&mut self, keep: &HashSet<EntityId>) -> usize {
        let before = self.items.len();
        self.items.retain(|id, _| keep.contains(id));
        before - self.items.len()
    }
}

impl<'c, T: Entity> IntoIterator for &'c EntityCollection<T> {
    type Item = &'c T;
    type IntoIter = std::collections::hash_map::Values<'c, EntityId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}
