use serde_json::Value;

use super::FormatterRegistry;
use super::common::{array_formatter, string_to_object_formatter};
use crate::keys::ConfigKey;
use crate::monitor::MonitorFields;
use crate::value::{display_value, is_truthy};

pub(super) fn register(registry: &mut FormatterRegistry) {
    registry
        .transform(ConfigKey::ThrottlingConfig, throttling_formatter)
        .transform(ConfigKey::SyntheticsArgs, array_formatter)
        .transform(ConfigKey::JourneyFiltersTags, array_formatter)
        .transform(ConfigKey::PlaywrightOptions, string_to_object_formatter);
}

/// Renders the network throttling profile as `5d/3u/20l`, or `false` when
/// throttling is disabled. Unset speeds are left out of the profile.
pub fn throttling_formatter(fields: &MonitorFields, _key: ConfigKey) -> Value {
    let enabled = fields
        .get(ConfigKey::IsThrottlingEnabled)
        .is_some_and(is_truthy);
    if !enabled {
        return Value::Bool(false);
    }

    let profile = [
        (ConfigKey::DownloadSpeed, 'd'),
        (ConfigKey::UploadSpeed, 'u'),
        (ConfigKey::Latency, 'l'),
    ]
    .into_iter()
    .filter_map(|(key, suffix)| {
        fields
            .get(key)
            .filter(|value| is_truthy(value))
            .map(|value| format!("{}{suffix}", display_value(value)))
    })
    .collect::<Vec<_>>()
    .join("/");

    Value::String(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn throttled(download: &str, upload: &str, latency: &str) -> MonitorFields {
        MonitorFields::new()
            .with(ConfigKey::IsThrottlingEnabled, true)
            .with(ConfigKey::DownloadSpeed, download)
            .with(ConfigKey::UploadSpeed, upload)
            .with(ConfigKey::Latency, latency)
    }

    #[test]
    fn full_profile() {
        let monitor = throttled("5", "3", "20");
        assert_eq!(
            throttling_formatter(&monitor, ConfigKey::ThrottlingConfig),
            json!("5d/3u/20l")
        );
    }

    #[test]
    fn unset_parts_are_skipped() {
        let monitor = throttled("5", "", "20");
        assert_eq!(
            throttling_formatter(&monitor, ConfigKey::ThrottlingConfig),
            json!("5d/20l")
        );
    }

    #[test]
    fn disabled_throttling_is_false() {
        let monitor = throttled("5", "3", "20").with(ConfigKey::IsThrottlingEnabled, false);
        assert_eq!(
            throttling_formatter(&monitor, ConfigKey::ThrottlingConfig),
            json!(false)
        );
    }
}
