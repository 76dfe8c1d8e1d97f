//! Attributes of a WebSocket session.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed JSON values filled in during the handshake and visible to
/// every message of the session.
///
/// Mirrors the `insert` / `get` API of `actix_session::Session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionAttributes(Map<String, Value>);

impl SessionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.0.insert(key.into(), value);
        Ok(())
    }

    /// `Ok(None)` when the key is absent, an error when it holds another type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.0
            .get(key)
            .map(|value| T::deserialize(value))
            .transpose()
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
