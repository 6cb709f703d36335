//! Closed set of monitor configuration keys and monitor kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Raised when a string does not name a recognized configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized monitor configuration key `{0}`")]
pub struct UnknownConfigKey(pub String);

macro_rules! config_keys {
    ($( $(#[$meta:meta])* $variant:ident => $wire:literal, )+) => {
        /// Recognized monitor configuration field. Each variant maps to the
        /// dotted field name used by the heartbeat agent.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ConfigKey {
            $( $(#[$meta])* $variant, )+
        }

        impl ConfigKey {
            /// Every key, in declaration order.
            pub const ALL: &'static [ConfigKey] = &[ $( ConfigKey::$variant, )+ ];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $wire => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

config_keys! {
    ApmServiceName => "service.name",
    CustomHeartbeatId => "custom_heartbeat_id",
    ConfigId => "config_id",
    ConfigHash => "hash",
    Enabled => "enabled",
    FormMonitorType => "form_monitor_type",
    Hosts => "hosts",
    IgnoreHttpsErrors => "ignore_https_errors",
    MonitorSourceType => "origin",
    JourneyFiltersMatch => "filter_journeys.match",
    JourneyFiltersTags => "filter_journeys.tags",
    JourneyId => "journey_id",
    MaxRedirects => "max_redirects",
    /// UI-only bookkeeping object, e.g. `{"is_tls_enabled": true}`.
    Metadata => "__ui",
    Mode => "mode",
    MonitorType => "type",
    Name => "name",
    Namespace => "namespace",
    Locations => "locations",
    /// JSON-encoded monitor-local parameters (browser monitors only).
    Params => "params",
    Password => "password",
    PlaywrightOptions => "playwright_options",
    OriginalSpace => "original_space",
    Port => "url.port",
    ProxyUrl => "proxy_url",
    ProxyHeaders => "proxy_headers",
    ProxyUseLocalResolver => "proxy_use_local_resolver",
    ResponseBodyCheckNegative => "check.response.body.negative",
    ResponseBodyCheckPositive => "check.response.body.positive",
    ResponseJsonCheck => "check.response.json",
    ResponseBodyIndex => "response.include_body",
    ResponseHeadersCheck => "check.response.headers",
    ResponseBodyMaxBytes => "response.include_body_max_bytes",
    ResponseHeadersIndex => "response.include_headers",
    ResponseReceiveCheck => "check.receive",
    ResponseStatusCheck => "check.response.status",
    RequestBodyCheck => "check.request.body",
    RequestHeadersCheck => "check.request.headers",
    RequestMethodCheck => "check.request.method",
    RequestSendCheck => "check.send",
    Revision => "revision",
    Schedule => "schedule",
    Screenshots => "screenshots",
    SourceProjectContent => "source.project.content",
    SourceInline => "source.inline.script",
    Ipv4 => "ipv4",
    Ipv6 => "ipv6",
    ProjectId => "project_id",
    SyntheticsArgs => "synthetics_args",
    TextAssertion => "playwright_text_assertion",
    TlsCertificateAuthorities => "ssl.certificate_authorities",
    TlsCertificate => "ssl.certificate",
    TlsKey => "ssl.key",
    TlsKeyPassphrase => "ssl.key_passphrase",
    TlsVerificationMode => "ssl.verification_mode",
    TlsVersion => "ssl.supported_protocols",
    Tags => "tags",
    Timeout => "timeout",
    /// Pre-rendered throttling profile; renamed to `throttling` on the wire.
    ThrottlingConfig => "throttling.config",
    IsThrottlingEnabled => "throttling.is_enabled",
    DownloadSpeed => "throttling.download_speed",
    UploadSpeed => "throttling.upload_speed",
    Latency => "throttling.latency",
    Urls => "urls",
    Username => "username",
    Wait => "wait",
    MonitorQueryId => "id",
    AlertConfig => "alert",
    Secrets => "secrets",
    /// Envelope metadata injected by the heartbeat request builder.
    Fields => "fields",
    FieldsUnderRoot => "fields_under_root",
}

impl ConfigKey {
    /// Keys carrying TLS settings are suppressed when TLS is disabled.
    pub fn is_tls(self) -> bool {
        self.as_str().contains(crate::format_configs::TLS_KEY_MARKER)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = UnknownConfigKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownConfigKey(s.to_owned()))
    }
}

impl Serialize for ConfigKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfigKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of synthetic monitor, read from the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorType {
    Browser,
    Http,
    Tcp,
    Icmp,
}

impl MonitorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Http => "http",
            Self::Tcp => "tcp",
            Self::Icmp => "icmp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "browser" => Some(Self::Browser),
            "http" => Some(Self::Http),
            "tcp" => Some(Self::Tcp),
            "icmp" => Some(Self::Icmp),
            _ => None,
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wire_names_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for key in ConfigKey::ALL {
            assert!(seen.insert(key.as_str()), "duplicate wire name {key}");
            assert_eq!(ConfigKey::parse(key.as_str()), Some(*key));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "not.a.key".parse::<ConfigKey>().unwrap_err();
        assert_eq!(err, UnknownConfigKey("not.a.key".to_owned()));
        assert!(err.to_string().contains("not.a.key"));
    }

    #[test]
    fn tls_keys_are_the_ssl_prefixed_ones() {
        let tls: Vec<_> = ConfigKey::ALL
            .iter()
            .copied()
            .filter(|key| key.is_tls())
            .collect();
        assert_eq!(
            tls,
            vec![
                ConfigKey::TlsCertificateAuthorities,
                ConfigKey::TlsCertificate,
                ConfigKey::TlsKey,
                ConfigKey::TlsKeyPassphrase,
                ConfigKey::TlsVerificationMode,
                ConfigKey::TlsVersion,
            ]
        );
    }

    #[test]
    fn keys_serialize_as_wire_names() {
        let json = serde_json::to_string(&ConfigKey::ThrottlingConfig).unwrap();
        assert_eq!(json, "\"throttling.config\"");
        let key: ConfigKey = serde_json::from_str("\"ssl.key\"").unwrap();
        assert_eq!(key, ConfigKey::TlsKey);
    }

    #[test]
    fn monitor_type_round_trips_through_text() {
        assert_eq!(MonitorType::parse("browser"), Some(MonitorType::Browser));
        assert_eq!(MonitorType::parse("BROWSER"), None);
        assert_eq!(MonitorType::Icmp.to_string(), "icmp");
    }
}
