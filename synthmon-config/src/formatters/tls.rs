use super::FormatterRegistry;
use super::common::array_formatter;
use crate::keys::ConfigKey;

pub(super) fn register(registry: &mut FormatterRegistry) {
    registry.transform(ConfigKey::TlsVersion, array_formatter);
}
