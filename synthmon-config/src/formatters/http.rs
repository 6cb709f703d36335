use serde_json::Value;

use super::FormatterRegistry;
use super::common::{array_formatter, object_formatter};
use crate::keys::ConfigKey;
use crate::monitor::MonitorFields;
use crate::value::is_truthy;

pub(super) fn register(registry: &mut FormatterRegistry) {
    registry
        .transform(ConfigKey::ProxyHeaders, object_formatter)
        .transform(ConfigKey::ResponseBodyCheckNegative, array_formatter)
        .transform(ConfigKey::ResponseBodyCheckPositive, array_formatter)
        .transform(ConfigKey::ResponseJsonCheck, array_formatter)
        .transform(ConfigKey::ResponseHeadersCheck, object_formatter)
        .transform(ConfigKey::ResponseStatusCheck, array_formatter)
        .transform(ConfigKey::RequestBodyCheck, request_body_formatter)
        .transform(ConfigKey::RequestHeadersCheck, object_formatter);
}

/// The UI stores the request body as `{"type": "json", "value": "..."}`; the
/// agent only wants the body text.
pub fn request_body_formatter(fields: &MonitorFields, key: ConfigKey) -> Value {
    match fields.get(key) {
        Some(Value::Object(body)) => body
            .get("value")
            .filter(|value| is_truthy(value))
            .cloned()
            .unwrap_or(Value::Null),
        Some(Value::String(body)) if !body.is_empty() => Value::String(body.clone()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_extracts_value() {
        let key = ConfigKey::RequestBodyCheck;
        let monitor =
            MonitorFields::new().with(key, json!({"type": "json", "value": "{\"a\":1}"}));
        assert_eq!(request_body_formatter(&monitor, key), json!("{\"a\":1}"));

        let empty = MonitorFields::new().with(key, json!({"type": "text", "value": ""}));
        assert_eq!(request_body_formatter(&empty, key), Value::Null);
    }
}
