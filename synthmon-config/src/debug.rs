//! Debug and tracing configuration

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TRACE_TARGETS;

/// Trace level for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl TraceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TraceLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

/// Debug and tracing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DebugConfig {
    /// Enable structured logging for development and troubleshooting
    #[serde(default)]
    pub enable_tracing: bool,

    /// Trace level (error, warn, info, debug, trace)
    #[serde(default)]
    pub trace_level: TraceLevel,

    /// List of tracing targets to enable
    /// Examples: "synthmon_config::format_configs", "synthmon"
    #[serde(default)]
    pub trace_targets: Vec<String>,
}

impl DebugConfig {
    /// `EnvFilter` directive string built from the configured targets.
    pub fn filter_directives(&self) -> String {
        let level = self.trace_level.as_str();
        if self.trace_targets.is_empty() {
            DEFAULT_TRACE_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(",")
        } else {
            self.trace_targets
                .iter()
                .map(|target| format!("{}={level}", target.trim()))
                .collect::<Vec<_>>()
                .join(",")
        }
    }

    pub fn validate(&self) -> Result<()> {
        for target in &self.trace_targets {
            let trimmed = target.trim();
            ensure!(!trimmed.is_empty(), "debug.trace_targets must not contain empty entries");
            ensure!(
                !trimmed.contains(|c: char| c.is_whitespace() || c == ',' || c == '='),
                "debug.trace_targets entry `{trimmed}` must be a bare target path"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_levels_fall_back_to_default() {
        let config: DebugConfig = toml::from_str("trace_level = \"loud\"").unwrap();
        assert_eq!(config.trace_level, TraceLevel::Warn);

        let config: DebugConfig = toml::from_str("trace_level = \"DEBUG\"").unwrap();
        assert_eq!(config.trace_level, TraceLevel::Debug);
    }

    #[test]
    fn directives_use_default_targets() {
        let config = DebugConfig {
            trace_level: TraceLevel::Info,
            ..DebugConfig::default()
        };
        assert_eq!(
            config.filter_directives(),
            "synthmon=info,synthmon_config=info,synthmon::diagnostics=info"
        );
    }

    #[test]
    fn directives_use_configured_targets() {
        let config = DebugConfig {
            enable_tracing: true,
            trace_level: TraceLevel::Trace,
            trace_targets: vec!["synthmon_config::format_configs".to_owned()],
        };
        assert_eq!(
            config.filter_directives(),
            "synthmon_config::format_configs=trace"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_targets_fail_validation() {
        for target in ["", "a b", "a=debug", "a,b"] {
            let config = DebugConfig {
                trace_targets: vec![target.to_owned()],
                ..DebugConfig::default()
            };
            assert!(config.validate().is_err(), "{target:?} should be rejected");
        }
    }
}
