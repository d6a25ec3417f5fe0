//! Session and state bags populated by parsers alongside the request

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String keyed JSON values a parser extracts from a platform payload,
/// used for both the session and the state output of a parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    /// Arbitrary context data
    pub data: Map<String, Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.data.insert(key.into(), value);
        Ok(())
    }

    /// Get a value from the context
    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.data.get(key) {
            Some(value) => {
                let parsed = serde_json::from_value(value.clone()).map_err(CoreError::from)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Copy every entry of a JSON object into the context; returns false
    /// and leaves the context untouched for anything else
    pub fn merge_value(&mut self, value: &Value) -> bool {
        match value.as_object() {
            Some(object) => {
                self.data
                    .extend(object.iter().map(|(k, v)| (k.clone(), v.clone())));
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
