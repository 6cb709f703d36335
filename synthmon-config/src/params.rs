//! Merging of global parameter defaults with monitor-local overrides.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::keys::ConfigKey;
use crate::monitor::MonitorFields;

/// Parameter name to value. Values are normally strings; insertion order is
/// preserved so the serialized form is stable.
pub type ParamsMap = Map<String, Value>;

/// Outcome of layering a monitor's params blob over the global params.
#[derive(Debug)]
pub enum ParamsMerge {
    /// Global params with the monitor-local entries applied on top.
    Merged(ParamsMap),
    /// The monitor-local blob was not valid JSON, or was a list or string;
    /// nothing was merged.
    ParseFailed {
        global: ParamsMap,
        error: serde_json::Error,
    },
}

impl ParamsMerge {
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Serialized and structured forms of the effective params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MixedParams {
    /// JSON encoding of `params`, or empty when there is nothing to send.
    pub serialized: String,
    pub params: ParamsMap,
}

/// Layer the monitor's `params` blob over a copy of `global`.
///
/// Colliding keys take the monitor value but keep the global key's position.
/// A blank or missing blob leaves the global params untouched.
pub fn merge_monitor_params(global: Option<&ParamsMap>, monitor: &MonitorFields) -> ParamsMerge {
    let mut params = global.cloned().unwrap_or_default();

    let local = match monitor.get(ConfigKey::Params) {
        Some(Value::String(raw)) if !raw.is_empty() => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(local)) => local,
            // Scalars carry no entries to layer over the global params.
            Ok(Value::Null | Value::Bool(_) | Value::Number(_)) => {
                return ParamsMerge::Merged(params);
            }
            Ok(other) => match serde_json::from_value::<ParamsMap>(other) {
                Ok(local) => local,
                Err(error) => {
                    return ParamsMerge::ParseFailed {
                        global: params,
                        error,
                    };
                }
            },
            Err(error) => {
                return ParamsMerge::ParseFailed {
                    global: params,
                    error,
                };
            }
        },
        Some(Value::Object(local)) => local.clone(),
        _ => return ParamsMerge::Merged(params),
    };

    for (name, value) in local {
        params.insert(name, value);
    }
    ParamsMerge::Merged(params)
}

/// Merge global and monitor params, producing the string handed to the agent
/// and the map used for placeholder substitution.
///
/// A malformed monitor blob degrades to the global params with an empty
/// serialized form.
pub fn mix_params_with_global_params(
    global: Option<&ParamsMap>,
    monitor: &MonitorFields,
) -> MixedParams {
    match merge_monitor_params(global, monitor) {
        ParamsMerge::Merged(params) => {
            let serialized = if params.is_empty() {
                String::new()
            } else {
                Value::Object(params.clone()).to_string()
            };
            MixedParams { serialized, params }
        }
        ParamsMerge::ParseFailed { global, error } => {
            tracing::debug!(%error, "ignoring malformed monitor params");
            MixedParams {
                serialized: String::new(),
                params: global,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> ParamsMap {
        match value {
            Value::Object(map) => map,
            _ => ParamsMap::new(),
        }
    }

    fn browser_with_params(raw: &str) -> MonitorFields {
        MonitorFields::new()
            .with(ConfigKey::MonitorType, "browser")
            .with(ConfigKey::Params, raw)
    }

    #[test]
    fn local_params_extend_global_params() {
        let global = map(json!({"a": 1}));
        let mixed = mix_params_with_global_params(Some(&global), &browser_with_params(r#"{"b":2}"#));
        assert_eq!(mixed.serialized, r#"{"a":1,"b":2}"#);
        assert_eq!(mixed.params, map(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn local_params_win_on_collision_but_keep_position() {
        let global = map(json!({"a": "global", "z": "tail"}));
        let mixed =
            mix_params_with_global_params(Some(&global), &browser_with_params(r#"{"a":"local"}"#));
        assert_eq!(mixed.serialized, r#"{"a":"local","z":"tail"}"#);
    }

    #[test]
    fn malformed_local_params_fall_back_to_global() {
        let global = map(json!({"a": 1}));
        let monitor = browser_with_params("{bad json");

        let merge = merge_monitor_params(Some(&global), &monitor);
        assert!(!merge.is_merged());

        let mixed = mix_params_with_global_params(Some(&global), &monitor);
        assert_eq!(mixed.serialized, "");
        assert_eq!(mixed.params, global);
    }

    #[test]
    fn null_local_params_keep_global_params() {
        let global = map(json!({"a": "1"}));
        let monitor = browser_with_params("null");

        assert!(merge_monitor_params(Some(&global), &monitor).is_merged());

        let mixed = mix_params_with_global_params(Some(&global), &monitor);
        assert_eq!(mixed.serialized, r#"{"a":"1"}"#);
        assert_eq!(mixed.params, global);

        let mixed = mix_params_with_global_params(Some(&global), &browser_with_params("7"));
        assert_eq!(mixed.serialized, r#"{"a":"1"}"#);
    }

    #[test]
    fn non_object_local_params_are_a_parse_failure() {
        let global = map(json!({"a": 1}));
        let merge = merge_monitor_params(Some(&global), &browser_with_params("[1,2]"));
        match merge {
            ParamsMerge::ParseFailed { global: kept, .. } => assert_eq!(kept, global),
            ParamsMerge::Merged(_) => panic!("array params must not merge"),
        }
    }

    #[test]
    fn empty_result_serializes_to_empty_string() {
        let mixed = mix_params_with_global_params(None, &MonitorFields::new());
        assert_eq!(mixed, MixedParams::default());

        let mixed = mix_params_with_global_params(None, &browser_with_params("{}"));
        assert_eq!(mixed.serialized, "");
        assert!(mixed.params.is_empty());
    }

    #[test]
    fn blank_local_params_keep_global() {
        let global = map(json!({"a": "x"}));
        let mixed = mix_params_with_global_params(Some(&global), &browser_with_params(""));
        assert_eq!(mixed.serialized, r#"{"a":"x"}"#);
    }

    #[test]
    fn decoded_local_params_are_merged() {
        let monitor = MonitorFields::new().with(ConfigKey::Params, json!({"k": "v"}));
        let mixed = mix_params_with_global_params(None, &monitor);
        assert_eq!(mixed.serialized, r#"{"k":"v"}"#);
    }
}
