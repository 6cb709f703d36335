use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::debug::DebugConfig;
use crate::params::ParamsMap;

/// Effective `synthmon.toml` contents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SynthmonConfig {
    /// Global parameter defaults applied to every monitor.
    #[serde(default)]
    pub params: ParamsMap,

    #[serde(default)]
    pub debug: DebugConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl SynthmonConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in &self.params {
            ensure!(!name.trim().is_empty(), "params must not contain an empty name");
            ensure!(
                !name.contains(['{', '}', ':']),
                "params.{name} cannot be referenced from a placeholder"
            );
            ensure!(
                value.is_string(),
                "params.{name} must be a string, found {value}"
            );
        }
        self.debug
            .validate()
            .context("Invalid [debug] configuration")?;
        Ok(())
    }
}

/// How formatted records are printed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "OutputConfig::default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: Self::default_pretty(),
        }
    }
}

impl OutputConfig {
    const fn default_pretty() -> bool {
        true
    }
}
