//! Provide a [`Context`] for resolvers.
//!
//! Every resolver of a request receives a clone of the same [`Context`], backed by a
//! DashMap, which allows data to be shared between resolvers, including across
//! sequentially executed mutation fields.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;

use crate::json_ext::Value;

/// Holds [`Context`] entries.
pub(crate) type Entries = Arc<DashMap<String, Value>>;

/// Per-request value shared by every resolver.
#[derive(Clone, Debug, Default)]
pub struct Context {
    entries: Entries,
}

impl Context {
    pub fn new() -> Self {
        Context {
            entries: Default::default(),
        }
    }

    /// Returns a deserialized copy of the entry for `key`.
    pub fn get<K, V>(&self, key: K) -> Result<Option<V>, serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de>,
    {
        self.entries
            .get(&key.into())
            .map(|v| serde_json_bytes::from_value(v.value().clone()))
            .transpose()
    }

    /// Inserts an entry, returning the previous one.
    pub fn insert<K, V>(&self, key: K, value: V) -> Result<Option<V>, serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de> + Serialize,
    {
        let value = serde_json_bytes::to_value(value)?;
        self.entries
            .insert(key.into(), value)
            .map(serde_json_bytes::from_value)
            .transpose()
    }

    /// Updates an entry in place, starting from `default()` when it is absent.
    ///
    /// The update happens under the entry lock, so concurrent upserts of one key do not
    /// lose writes.
    pub fn upsert<K, V>(
        &self,
        key: K,
        upsert: impl FnOnce(V) -> V,
        default: impl FnOnce() -> V,
    ) -> Result<(), serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de> + Serialize,
    {
        let key = key.into();
        let default = serde_json_bytes::to_value((default)())?;
        let mut entry = self.entries.entry(key).or_insert(default);
        let current = serde_json_bytes::from_value(entry.value().clone())?;
        *entry.value_mut() = serde_json_bytes::to_value((upsert)(current))?;
        Ok(())
    }

    /// Removes an entry, returning it.
    pub fn remove<K, V>(&self, key: K) -> Result<Option<V>, serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de>,
    {
        self.entries
            .remove(&key.into())
            .map(|(_, v)| serde_json_bytes::from_value(v))
            .transpose()
    }

    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: Into<String>,
    {
        self.entries.contains_key(&key.into())
    }
}

#[cfg(test)]
mod tests;
