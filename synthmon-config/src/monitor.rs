//! Ordered UI monitor records keyed by [`ConfigKey`].

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::keys::{ConfigKey, MonitorType};
use crate::value::is_truthy;

/// Raised when a monitor record cannot be built from JSON input.
#[derive(Debug, Error)]
pub enum MonitorFieldsError {
    #[error("monitor configuration must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("failed to parse monitor configuration JSON")]
    Json(#[from] serde_json::Error),
}

/// A UI-facing monitor configuration: an ordered mapping from recognized key
/// to loosely-typed value. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorFields {
    fields: IndexMap<ConfigKey, Value>,
}

/// Result of parsing a JSON object that may contain keys outside the
/// recognized set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMonitor {
    pub fields: MonitorFields,
    pub ignored_keys: Vec<String>,
}

impl MonitorFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ConfigKey) -> Option<&Value> {
        self.fields.get(&key)
    }

    pub fn get_str(&self, key: ConfigKey) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Insert or replace a value. A replaced key keeps its position.
    pub fn insert(&mut self, key: ConfigKey, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key, value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: ConfigKey, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: ConfigKey) -> Option<Value> {
        self.fields.shift_remove(&key)
    }

    pub fn contains_key(&self, key: ConfigKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        self.fields.keys().copied()
    }

    /// Keys in insertion order, ready to drive a formatting pass.
    pub fn key_list(&self) -> Vec<ConfigKey> {
        self.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigKey, &Value)> {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    pub fn monitor_type(&self) -> Option<MonitorType> {
        self.get_str(ConfigKey::MonitorType).and_then(MonitorType::parse)
    }

    pub fn is_browser(&self) -> bool {
        self.monitor_type() == Some(MonitorType::Browser)
    }

    /// Reads `__ui.is_tls_enabled`; a missing flag means disabled.
    pub fn is_tls_enabled(&self) -> bool {
        self.get(ConfigKey::Metadata)
            .and_then(|metadata| metadata.get("is_tls_enabled"))
            .is_some_and(is_truthy)
    }

    /// Build a record from a JSON object, separating keys outside the
    /// recognized set.
    pub fn from_json_map(map: Map<String, Value>) -> ParsedMonitor {
        let mut fields = Self::new();
        let mut ignored_keys = Vec::new();
        for (name, value) in map {
            match ConfigKey::parse(&name) {
                Some(key) => {
                    fields.insert(key, value);
                }
                None => ignored_keys.push(name),
            }
        }
        ParsedMonitor {
            fields,
            ignored_keys,
        }
    }

    pub fn from_value(value: Value) -> Result<ParsedMonitor, MonitorFieldsError> {
        match value {
            Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(MonitorFieldsError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn from_json_str(input: &str) -> Result<ParsedMonitor, MonitorFieldsError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// JSON object keyed by wire names.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, value)| (key.as_str().to_owned(), value.clone()))
                .collect(),
        )
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FromIterator<(ConfigKey, Value)> for MonitorFields {
    fn from_iter<I: IntoIterator<Item = (ConfigKey, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for MonitorFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MonitorFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let parsed = Self::from_value(value).map_err(de::Error::custom)?;
        if !parsed.ignored_keys.is_empty() {
            tracing::debug!(
                ignored = ?parsed.ignored_keys,
                "dropping unrecognized monitor configuration keys"
            );
        }
        Ok(parsed.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parsing_keeps_order_and_reports_unknown_keys() {
        let parsed = MonitorFields::from_value(json!({
            "type": "http",
            "custom_field": 1,
            "urls": "https://example.com",
            "schedule": {"number": "3", "unit": "m"},
        }))
        .unwrap();

        assert_eq!(
            parsed.fields.key_list(),
            vec![ConfigKey::MonitorType, ConfigKey::Urls, ConfigKey::Schedule]
        );
        assert_eq!(parsed.ignored_keys, vec!["custom_field".to_owned()]);
        assert_eq!(parsed.fields.monitor_type(), Some(MonitorType::Http));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = MonitorFields::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));

        let err = MonitorFields::from_json_str("{nope").unwrap_err();
        assert!(matches!(err, MonitorFieldsError::Json(_)));
    }

    #[test]
    fn tls_flag_requires_truthy_metadata() {
        let mut monitor = MonitorFields::new();
        assert!(!monitor.is_tls_enabled());

        monitor.insert(ConfigKey::Metadata, json!({"is_tls_enabled": false}));
        assert!(!monitor.is_tls_enabled());

        monitor.insert(ConfigKey::Metadata, json!({"is_tls_enabled": true}));
        assert!(monitor.is_tls_enabled());
    }

    #[test]
    fn serde_uses_wire_names() {
        let monitor = MonitorFields::new()
            .with(ConfigKey::MonitorType, "browser")
            .with(ConfigKey::TlsKey, "secret");
        let json = serde_json::to_string(&monitor).unwrap();
        assert_eq!(json, r#"{"type":"browser","ssl.key":"secret"}"#);

        let back: MonitorFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, monitor);
        assert!(back.is_browser());
    }

    #[test]
    fn replacing_a_value_keeps_its_position() {
        let mut monitor = MonitorFields::new()
            .with(ConfigKey::MonitorQueryId, "a")
            .with(ConfigKey::Name, "n");
        monitor.insert(ConfigKey::MonitorQueryId, "b");
        assert_eq!(
            monitor.key_list(),
            vec![ConfigKey::MonitorQueryId, ConfigKey::Name]
        );
        assert_eq!(monitor.get_str(ConfigKey::MonitorQueryId), Some("b"));
    }
}
