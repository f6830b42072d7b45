//! Read-only, name-indexed collections of scripts, queries and tables.
//!
//! Lookups and iteration work over whatever the collection was built with.
//! Every write operation fails until management features land.

use crate::entity::{Entity, Query, Script, TableData};
use crate::error::{KakapoError, Result};
use std::collections::btree_map::{self, BTreeMap};
use std::ops::Deref;

/// What an insert should do when the name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDuplicate {
    #[default]
    Update,
    Ignore,
    Fail,
}

/// Entities keyed by name, iterated in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityList<T> {
    items: BTreeMap<String, T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<T: Entity> EntityList<T> {
    /// A collection with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a collection; a later entity replaces an earlier one of the same name.
    pub fn from_entities(entities: impl IntoIterator<Item = T>) -> Self {
        entities.into_iter().collect()
    }

    /// Looks up an entity by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, T> {
        self.items.values()
    }
}

impl<T: Entity> FromIterator<T> for EntityList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|entity| (entity.name().to_string(), entity))
                .collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = btree_map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl<T> IntoIterator for EntityList<T> {
    type Item = T;
    type IntoIter = btree_map::IntoValues<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

/// Stored queries.
pub type QueryList = EntityList<Query>;

/// Tables reachable from a script.
pub type TableDataList = EntityList<TableData>;

impl EntityList<Query> {
    /// Stores a query. Not available yet: always fails.
    pub fn insert(&mut self, _name: &str, _on_duplicate: OnDuplicate) -> Result<&Query> {
        Err(KakapoError::management_unavailable())
    }
}

impl EntityList<TableData> {
    /// Creates a table. Not available yet: always fails.
    pub fn insert(&mut self, _name: &str) -> Result<&TableData> {
        Err(KakapoError::management_unavailable())
    }
}

/// Stored scripts, aware of which one is currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptList {
    scripts: EntityList<Script>,
    current: String,
}

impl ScriptList {
    pub fn new(scripts: EntityList<Script>, current: impl Into<String>) -> Self {
        Self {
            scripts,
            current: current.into(),
        }
    }

    /// The running script, if it is visible in this collection.
    pub fn me(&self) -> Option<&Script> {
        self.scripts.get(&self.current)
    }

    /// Name of the running script.
    pub fn current_name(&self) -> &str {
        &self.current
    }

    /// Stores a script. Not available yet: always fails.
    pub fn insert(&mut self, _name: &str, _on_duplicate: OnDuplicate) -> Result<&Script> {
        Err(KakapoError::management_unavailable())
    }
}

impl Deref for ScriptList {
    type Target = EntityList<Script>;

    fn deref(&self) -> &Self::Target {
        &self.scripts
    }
}

impl<'a> IntoIterator for &'a ScriptList {
    type Item = &'a Script;
    type IntoIter = btree_map::Values<'a, String, Script>;

    fn into_iter(self) -> Self::IntoIter {
        self.scripts.iter()
    }
}
