use serde_json::Value;

use crate::config::{FieldsConfig, Transform};
use crate::session::is_blank;

/// Applies the field's configured transform. Blank values (`null`, `""`)
/// pass through untouched.
pub fn format_value(value: &Value, field: &str, fields_config: &FieldsConfig) -> Value {
    let transform = fields_config
        .get(field)
        .and_then(|config| config.parse.as_ref());
    apply_transform(value, transform)
}

pub fn apply_transform(value: &Value, transform: Option<&Transform>) -> Value {
    if is_blank(value) {
        return value.clone();
    }
    match transform {
        Some(parse) => (**parse)(value),
        None => value.clone(),
    }
}

/// Text form of a value for titles: strings as-is, `null` as empty.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
