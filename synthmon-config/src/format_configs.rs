//! Conversion of UI monitor records into heartbeat-ready records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use synthmon_commons::DiagnosticsSink;

use crate::formatters::{FormatterRegistry, default_registry};
use crate::keys::ConfigKey;
use crate::monitor::MonitorFields;
use crate::params::{ParamsMap, mix_params_with_global_params};
use crate::templating::replace_string_with_params;
use crate::value::{display_value, is_unset, truthy_text};

/// Substring identifying TLS settings.
pub const TLS_KEY_MARKER: &str = "ssl";

/// Internal fields that are never formatted into the heartbeat record.
pub const UI_KEYS_TO_SKIP: &[ConfigKey] = &[
    ConfigKey::JourneyId,
    ConfigKey::ProjectId,
    ConfigKey::Metadata,
    ConfigKey::UploadSpeed,
    ConfigKey::DownloadSpeed,
    ConfigKey::Latency,
    ConfigKey::IsThrottlingEnabled,
    ConfigKey::Revision,
    ConfigKey::CustomHeartbeatId,
    ConfigKey::FormMonitorType,
    ConfigKey::TextAssertion,
    ConfigKey::ConfigHash,
    ConfigKey::AlertConfig,
    ConfigKey::Secrets,
];

/// Fields whose values are never run through parameter substitution.
pub const PARAMS_KEYS_TO_SKIP: &[ConfigKey] = &[
    ConfigKey::Secrets,
    ConfigKey::Fields,
    ConfigKey::Params,
    ConfigKey::ProjectId,
    ConfigKey::JourneyId,
    ConfigKey::ConfigHash,
    ConfigKey::MonitorQueryId,
    ConfigKey::Locations,
    ConfigKey::TlsVersion,
    ConfigKey::SourceProjectContent,
    ConfigKey::SourceInline,
];

/// UI field name to heartbeat field name.
pub const UI_TO_HEARTBEAT_KEY_MAP: &[(ConfigKey, &str)] =
    &[(ConfigKey::ThrottlingConfig, "throttling")];

/// A monitor record ready for the heartbeat agent, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormattedConfig(IndexMap<String, Value>);

impl FormattedConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

fn is_remapped(key: ConfigKey) -> bool {
    UI_TO_HEARTBEAT_KEY_MAP.iter().any(|(ui_key, _)| *ui_key == key)
}

/// Format `config_keys` of `config` with the default formatter registry.
pub fn format_monitor_config_fields(
    config_keys: &[ConfigKey],
    config: &MonitorFields,
    diagnostics: &dyn DiagnosticsSink,
    params: &ParamsMap,
) -> FormattedConfig {
    format_monitor_config_fields_with(default_registry(), config_keys, config, diagnostics, params)
}

/// Format `config_keys` of `config` using `registry`.
///
/// Skipped, unset and non-applicable keys are left out; TLS keys are dropped
/// unless `__ui.is_tls_enabled` is set; UI names are renamed to their
/// heartbeat names; `null` results are pruned while other falsy values are
/// kept.
pub fn format_monitor_config_fields_with(
    registry: &FormatterRegistry,
    config_keys: &[ConfigKey],
    config: &MonitorFields,
    diagnostics: &dyn DiagnosticsSink,
    params: &ParamsMap,
) -> FormattedConfig {
    let is_browser = config.is_browser();
    // `None` marks a slot that was assigned but has no value.
    let mut staged: IndexMap<ConfigKey, Option<Value>> = IndexMap::new();

    for &key in config_keys {
        if !UI_KEYS_TO_SKIP.contains(&key) {
            let Some(value) = config.get(key).filter(|value| !is_unset(value)) else {
                continue;
            };
            if !is_browser && key == ConfigKey::Params {
                continue;
            }

            let formatted = match registry.get(key) {
                Some(formatter) => formatter.apply(config, key),
                None => value.clone(),
            };
            staged.insert(key, Some(formatted));
        }

        if !PARAMS_KEYS_TO_SKIP.contains(&key) {
            if let Some(Some(value)) = staged.get_mut(&key) {
                *value = replace_string_with_params(value, params, diagnostics);
            }
        }
    }

    if !config.is_tls_enabled() {
        for (key, slot) in &mut staged {
            if key.is_tls() {
                *slot = None;
            }
        }
    }

    let renamed: Vec<(&str, Option<Value>)> = UI_TO_HEARTBEAT_KEY_MAP
        .iter()
        .map(|(ui_key, heartbeat_key)| {
            (*heartbeat_key, staged.get(ui_key).cloned().flatten())
        })
        .collect();

    let mut output = IndexMap::with_capacity(staged.len());
    for (key, slot) in staged {
        if is_remapped(key) {
            continue;
        }
        if let Some(value) = slot.filter(|value| !value.is_null()) {
            output.insert(key.as_str().to_owned(), value);
        }
    }
    for (heartbeat_key, slot) in renamed {
        match slot.filter(|value| !value.is_null()) {
            Some(value) => {
                output.insert(heartbeat_key.to_owned(), value);
            }
            None => {
                output.shift_remove(heartbeat_key);
            }
        }
    }

    FormattedConfig(output)
}

/// Arguments of [`format_heartbeat_request`].
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatRequest<'a> {
    pub monitor: &'a MonitorFields,
    pub config_id: &'a str,
    pub heartbeat_id: Option<&'a str>,
    pub run_once: Option<bool>,
    pub test_run_id: Option<&'a str>,
}

impl<'a> HeartbeatRequest<'a> {
    pub fn new(monitor: &'a MonitorFields, config_id: &'a str) -> Self {
        Self {
            monitor,
            config_id,
            heartbeat_id: None,
            run_once: None,
            test_run_id: None,
        }
    }
}

/// Metadata injected at the root of every heartbeat event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatFields {
    pub config_id: String,
    #[serde(
        rename = "monitor.project.name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub project_name: Option<String>,
    #[serde(
        rename = "monitor.project.id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_once: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_run_id: Option<String>,
}

impl HeartbeatFields {
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("config_id".to_owned(), Value::String(self.config_id.clone()));
        if let Some(name) = &self.project_name {
            map.insert("monitor.project.name".to_owned(), Value::String(name.clone()));
        }
        if let Some(id) = &self.project_id {
            map.insert("monitor.project.id".to_owned(), Value::String(id.clone()));
        }
        if let Some(run_once) = self.run_once {
            map.insert("run_once".to_owned(), Value::Bool(run_once));
        }
        if let Some(test_run_id) = &self.test_run_id {
            map.insert("test_run_id".to_owned(), Value::String(test_run_id.clone()));
        }
        Value::Object(map)
    }
}

/// Dispatch envelope: the monitor record plus run metadata. Serializes as the
/// flat record handed to the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatConfig {
    pub monitor: MonitorFields,
    pub id: Option<String>,
    pub fields: HeartbeatFields,
    pub fields_under_root: bool,
    pub params: Option<String>,
}

impl HeartbeatConfig {
    /// Monitor record with the envelope keys written over it. Existing keys
    /// keep their position.
    pub fn to_monitor_fields(&self) -> MonitorFields {
        let mut record = self.monitor.clone();
        match &self.id {
            Some(id) => {
                record.insert(ConfigKey::MonitorQueryId, id.as_str());
            }
            None => {
                record.remove(ConfigKey::MonitorQueryId);
            }
        }
        record.insert(ConfigKey::Fields, self.fields.to_value());
        record.insert(ConfigKey::FieldsUnderRoot, self.fields_under_root);
        match &self.params {
            Some(params) => {
                record.insert(ConfigKey::Params, params.as_str());
            }
            None => {
                record.remove(ConfigKey::Params);
            }
        }
        record
    }
}

impl Serialize for HeartbeatConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_monitor_fields().serialize(serializer)
    }
}

/// Wrap a monitor into a heartbeat dispatch envelope.
///
/// `params` overrides the monitor's own params blob; either way params are
/// only sent for browser monitors.
pub fn format_heartbeat_request(
    request: &HeartbeatRequest<'_>,
    params: Option<&str>,
) -> HeartbeatConfig {
    let monitor = request.monitor;
    let project_id = truthy_text(monitor.get(ConfigKey::ProjectId));

    let id = request.heartbeat_id.map(str::to_owned).or_else(|| {
        monitor
            .get(ConfigKey::MonitorQueryId)
            .filter(|value| !value.is_null())
            .map(display_value)
    });

    let params_string = params.map(str::to_owned).or_else(|| {
        monitor
            .get(ConfigKey::Params)
            .filter(|value| !value.is_null())
            .map(display_value)
    });

    HeartbeatConfig {
        monitor: monitor.clone(),
        id,
        fields: HeartbeatFields {
            config_id: request.config_id.to_owned(),
            project_name: project_id.clone(),
            project_id,
            run_once: request.run_once,
            test_run_id: request.test_run_id.map(str::to_owned),
        },
        fields_under_root: true,
        params: if monitor.is_browser() {
            params_string
        } else {
            Some(String::new())
        },
    }
}

/// One monitor scheduled for dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigData {
    pub monitor: MonitorFields,
    pub config_id: String,
    pub heartbeat_id: Option<String>,
    pub run_once: Option<bool>,
    pub test_run_id: Option<String>,
    /// Global parameter defaults.
    pub params: ParamsMap,
}

impl ConfigData {
    pub fn request(&self) -> HeartbeatRequest<'_> {
        HeartbeatRequest {
            monitor: &self.monitor,
            config_id: &self.config_id,
            heartbeat_id: self.heartbeat_id.as_deref(),
            run_once: self.run_once,
            test_run_id: self.test_run_id.as_deref(),
        }
    }
}

/// Full pipeline for one monitor: merge params, wrap into the envelope, then
/// format the envelope's own fields.
pub fn format_config(data: &ConfigData, diagnostics: &dyn DiagnosticsSink) -> FormattedConfig {
    let mixed = mix_params_with_global_params(Some(&data.params), &data.monitor);
    let heartbeat = format_heartbeat_request(&data.request(), Some(mixed.serialized.as_str()));
    let record = heartbeat.to_monitor_fields();
    let formatted =
        format_monitor_config_fields(&record.key_list(), &record, diagnostics, &mixed.params);
    tracing::debug!(
        config_id = %data.config_id,
        input_keys = record.len(),
        output_keys = formatted.len(),
        "formatted monitor config"
    );
    formatted
}

pub fn format_configs(
    configs: &[ConfigData],
    diagnostics: &dyn DiagnosticsSink,
) -> Vec<FormattedConfig> {
    configs
        .iter()
        .map(|data| format_config(data, diagnostics))
        .collect()
}
