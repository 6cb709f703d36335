use super::FormatterRegistry;
use super::common::seconds_formatter;
use crate::keys::ConfigKey;

pub(super) fn register(registry: &mut FormatterRegistry) {
    registry.transform(ConfigKey::Wait, seconds_formatter);
}
