pub mod memory;

use serde_json::{Map, Value};

pub use memory::MemorySession;

/// One element of a loop's collection: field name -> raw value.
///
/// Sparse by construction. Blank fields are removed rather than stored empty.
pub type StoredItem = Map<String, Value>;

/// Session key recording the order in which loop sub-steps were completed.
pub const VISITED_SUB_STEPS_KEY: &str = "subSteps";

/// Session-scoped key/value storage consulted on every request.
///
/// Reads are not cached by callers; each operation goes back to the store.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn unset(&mut self, keys: &[String]);
}

/// `null` or the empty string.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Form-value truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads the item collection stored under `key`. Missing keys yield an empty
/// collection and non-object entries are skipped.
pub fn read_items(store: &dyn SessionStore, key: &str) -> Vec<StoredItem> {
    match store.get(key) {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(item) => Some(item),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn write_items(store: &mut dyn SessionStore, key: &str, items: Vec<StoredItem>) {
    store.set(
        key,
        Value::Array(items.into_iter().map(Value::Object).collect()),
    );
}

/// Number of entries stored under `key`, zero when absent or not a list.
pub fn stored_len(store: &dyn SessionStore, key: &str) -> usize {
    match store.get(key) {
        Some(Value::Array(entries)) => entries.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}

/// Sub-step names recorded by the success handler, oldest first.
pub fn visited_sub_steps(store: &dyn SessionStore) -> Vec<String> {
    match store.get(VISITED_SUB_STEPS_KEY) {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
