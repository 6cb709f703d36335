use crate::loader::merge_toml_values;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toml::Value as TomlValue;

/// Source of a configuration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigLayerSource {
    /// User-specific configuration (e.g., ~/.synthmon/synthmon.toml)
    User { file: PathBuf },
    /// Workspace configuration (synthmon.toml or .synthmon/synthmon.toml)
    Workspace { file: PathBuf },
    /// Explicitly selected file (--config or SYNTHMON_CONFIG_PATH)
    File { file: PathBuf },
    /// Runtime overrides (e.g., CLI flags)
    Runtime,
}

impl ConfigLayerSource {
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            Self::User { file } | Self::Workspace { file } | Self::File { file } => Some(file),
            Self::Runtime => None,
        }
    }
}

/// A single layer of configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayerEntry {
    /// Source of this layer
    pub source: ConfigLayerSource,
    /// Parsed TOML content
    pub config: TomlValue,
}

impl ConfigLayerEntry {
    pub fn new(source: ConfigLayerSource, config: TomlValue) -> Self {
        Self { source, config }
    }
}

/// A stack of configuration layers, ordered from lowest to highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayerStack {
    layers: Vec<ConfigLayerEntry>,
}

impl ConfigLayerStack {
    pub fn new(layers: Vec<ConfigLayerEntry>) -> Self {
        Self { layers }
    }

    pub fn push(&mut self, layer: ConfigLayerEntry) {
        self.layers.push(layer);
    }

    /// Merge all layers into a single effective configuration.
    pub fn effective_config(&self) -> TomlValue {
        let mut merged = TomlValue::Table(toml::Table::new());
        for layer in &self.layers {
            merge_toml_values(&mut merged, &layer.config);
        }
        merged
    }

    pub fn layers(&self) -> &[ConfigLayerEntry] {
        &self.layers
    }

    /// Highest-precedence layer that came from a file.
    pub fn last_file(&self) -> Option<&PathBuf> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.source.file())
    }
}
