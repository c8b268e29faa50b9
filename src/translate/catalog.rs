use std::{collections::HashMap, fs, path::Path};

use serde_json::Value;

use super::Translator;
use crate::errors::{Result, WizardError};

/// Translator backed by a locale document such as
/// `{"pages": {"confirm": {"header": "Check your answers"}}}`.
///
/// Nested objects are flattened into dotted keys.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(data)?;
        Self::from_value(&document)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_value(document: &Value) -> Result<Self> {
        let Value::Object(_) = document else {
            return Err(WizardError::Config(
                "locale document must be a JSON object".into(),
            ));
        };
        let mut catalog = Self::new();
        flatten_into(&mut catalog.entries, String::new(), document);
        Ok(catalog)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(entries, path, nested);
            }
        }
        Value::String(text) => {
            entries.insert(prefix, text.clone());
        }
        Value::Null => {}
        other => {
            entries.insert(prefix, other.to_string());
        }
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
