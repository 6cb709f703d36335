use serde_json::Value;

use super::FormatterRegistry;
use crate::keys::ConfigKey;
use crate::monitor::MonitorFields;
use crate::value::{display_value, is_truthy};

const DEFAULT_SOURCE_TYPE: &str = "ui";

pub(super) fn register(registry: &mut FormatterRegistry) {
    registry
        .transform(ConfigKey::MonitorSourceType, source_type_formatter)
        .transform(ConfigKey::Schedule, schedule_formatter)
        .transform(ConfigKey::Tags, array_formatter)
        .transform(ConfigKey::Timeout, seconds_formatter);
}

/// Non-empty arrays (or non-empty strings) pass through, anything else is
/// dropped.
pub fn array_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(Value::Array(items)) if !items.is_empty() => Value::Array(items.clone()),
        Some(Value::String(text)) if !text.is_empty() => Value::String(text.clone()),
        _ => Value::Null,
    }
}

/// Non-empty objects pass through, anything else is dropped.
pub fn object_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(Value::Object(map)) if !map.is_empty() => Value::Object(map.clone()),
        _ => Value::Null,
    }
}

/// Decodes a JSON object stored as a string. Empty or undecodable objects are
/// dropped.
pub fn string_to_object_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => Value::Null,
        },
        Some(Value::Object(_)) => object_formatter(fields, key),
        _ => Value::Null,
    }
}

/// `16` becomes `"16s"`.
pub fn seconds_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(value) if is_truthy(value) => Value::String(format!("{}s", display_value(value))),
        _ => Value::Null,
    }
}

/// `{"number": "3", "unit": "m"}` becomes `"@every 3m"`. Already rendered
/// schedules pass through.
pub fn schedule_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(Value::Object(schedule)) => {
            let number = schedule.get("number").filter(|n| is_truthy(n));
            let unit = schedule.get("unit").filter(|u| is_truthy(u));
            match (number, unit) {
                (Some(number), Some(unit)) => Value::String(format!(
                    "@every {}{}",
                    display_value(number),
                    display_value(unit)
                )),
                _ => Value::Null,
            }
        }
        Some(Value::String(rendered)) if !rendered.is_empty() => Value::String(rendered.clone()),
        _ => Value::Null,
    }
}

pub fn source_type_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(value) if is_truthy(value) => value.clone(),
        _ => Value::String(DEFAULT_SOURCE_TYPE.to_owned()),
    }
}
