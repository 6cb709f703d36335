//! Key-specific value formatters.
//!
//! Each entry either replaces the field with a fixed value or computes it from
//! the whole monitor record. Keys without an entry pass through unchanged.

mod browser;
mod common;
mod http;
mod icmp;
mod tls;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::keys::ConfigKey;
use crate::monitor::MonitorFields;

pub use browser::throttling_formatter;
pub use common::{
    array_formatter, object_formatter, schedule_formatter, seconds_formatter,
    source_type_formatter, string_to_object_formatter,
};
pub use http::request_body_formatter;

/// Computes a field from the monitor record. Returning `Value::Null` drops the
/// field from the formatted output.
pub type TransformFn = fn(&MonitorFields, ConfigKey) -> Value;

#[derive(Debug, Clone)]
pub enum Formatter {
    Constant(Value),
    Transform(TransformFn),
}

impl Formatter {
    pub fn apply(&self, config: &MonitorFields, key: ConfigKey) -> Value {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Transform(transform) => transform(config, key),
        }
    }
}

/// Formatter lookup table keyed by configuration key.
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    entries: IndexMap<ConfigKey, Formatter>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ConfigKey, formatter: Formatter) -> Option<Formatter> {
        self.entries.insert(key, formatter)
    }

    pub fn transform(&mut self, key: ConfigKey, transform: TransformFn) -> &mut Self {
        self.insert(key, Formatter::Transform(transform));
        self
    }

    pub fn constant(&mut self, key: ConfigKey, value: impl Into<Value>) -> &mut Self {
        self.insert(key, Formatter::Constant(value.into()));
        self
    }

    pub fn get(&self, key: ConfigKey) -> Option<&Formatter> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: ConfigKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        self.entries.keys().copied()
    }
}

static DEFAULT_REGISTRY: Lazy<FormatterRegistry> = Lazy::new(|| {
    let mut registry = FormatterRegistry::new();
    common::register(&mut registry);
    http::register(&mut registry);
    tls::register(&mut registry);
    icmp::register(&mut registry);
    browser::register(&mut registry);
    registry
});

/// Formatters for every monitor kind, merged into one table.
pub fn default_registry() -> &'static FormatterRegistry {
    &DEFAULT_REGISTRY
}
