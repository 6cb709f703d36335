use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG_PATH, ENV_WORKSPACE};
use crate::loader::config::SynthmonConfig;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};

/// Configuration manager for loading and validating configurations
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub(crate) config: SynthmonConfig,
    config_path: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
    pub(crate) layer_stack: ConfigLayerStack,
}

impl ConfigManager {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            let trimmed = config_path.trim();
            if !trimmed.is_empty() {
                return Self::load_from_file(trimmed).with_context(|| {
                    format!("Failed to load configuration from {ENV_CONFIG_PATH}={trimmed}")
                });
            }
        }

        if let Ok(workspace_path) = std::env::var(ENV_WORKSPACE) {
            let trimmed = workspace_path.trim();
            if !trimmed.is_empty() {
                return Self::load_from_workspace(trimmed).with_context(|| {
                    format!("Failed to load configuration from {ENV_WORKSPACE}={trimmed}")
                });
            }
        }

        Self::load_from_workspace(std::env::current_dir()?)
    }

    /// Load configuration from a specific workspace
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_workspace_with_home(workspace, dirs::home_dir())
    }

    /// Load configuration from a workspace, reading the user layer from
    /// `home` instead of the detected home directory.
    pub fn load_from_workspace_with_home(
        workspace: impl AsRef<Path>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let workspace_root = workspace.as_ref().to_path_buf();
        let mut layer_stack = ConfigLayerStack::default();

        // 1. User home config (~/.synthmon/synthmon.toml)
        if let Some(home) = home {
            let user_config = home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if user_config.is_file() {
                let toml = Self::load_toml_from_file(&user_config)?;
                layer_stack.push(ConfigLayerEntry::new(
                    ConfigLayerSource::User { file: user_config },
                    toml,
                ));
            }
        }

        // 2. Config directory (.synthmon/synthmon.toml)
        let dir_config = workspace_root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if dir_config.is_file() {
            let toml = Self::load_toml_from_file(&dir_config)?;
            layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Workspace { file: dir_config },
                toml,
            ));
        }

        // 3. Workspace root (synthmon.toml)
        let root_config = workspace_root.join(CONFIG_FILE_NAME);
        if root_config.is_file() {
            let toml = Self::load_toml_from_file(&root_config)?;
            layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Workspace { file: root_config },
                toml,
            ));
        }

        Self::from_layers(layer_stack, Some(workspace_root))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml = Self::load_toml_from_file(path)?;
        let layer_stack = ConfigLayerStack::new(vec![ConfigLayerEntry::new(
            ConfigLayerSource::File {
                file: path.to_path_buf(),
            },
            toml,
        )]);
        let workspace_root = path.parent().map(Path::to_path_buf);
        Self::from_layers(layer_stack, workspace_root)
    }

    fn load_toml_from_file(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: toml::Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(value)
    }

    fn from_layers(layer_stack: ConfigLayerStack, workspace_root: Option<PathBuf>) -> Result<Self> {
        let config = Self::evaluate(&layer_stack)?;
        let config_path = layer_stack.last_file().cloned();
        tracing::debug!(
            layers = layer_stack.layers().len(),
            config_path = ?config_path,
            "loaded synthmon configuration"
        );
        Ok(Self {
            config,
            config_path,
            workspace_root,
            layer_stack,
        })
    }

    pub(crate) fn evaluate(layer_stack: &ConfigLayerStack) -> Result<SynthmonConfig> {
        let config = if layer_stack.layers().is_empty() {
            SynthmonConfig::default()
        } else {
            layer_stack
                .effective_config()
                .try_into::<SynthmonConfig>()
                .context("Failed to deserialize effective configuration")?
        };
        config
            .validate()
            .context("Configuration failed validation")?;
        Ok(config)
    }

    pub fn config(&self) -> &SynthmonConfig {
        &self.config
    }

    pub fn into_config(self) -> SynthmonConfig {
        self.config
    }

    /// Highest-precedence file that contributed to the configuration.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn layer_stack(&self) -> &ConfigLayerStack {
        &self.layer_stack
    }
}
