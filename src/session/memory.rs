use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SessionStore;
use crate::errors::Result;

/// In-memory session backed by an ordered JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySession {
    values: Map<String, Value>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Loads a session snapshot written by [`MemorySession::save_to_path`].
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Sets every entry of `values`, keeping their order.
    pub fn set_all(&mut self, values: Map<String, Value>) {
        for (key, value) in values {
            self.values.insert(key, value);
        }
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn unset(&mut self, keys: &[String]) {
        for key in keys {
            self.values.shift_remove(key);
        }
    }
}
