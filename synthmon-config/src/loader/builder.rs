use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource};
use crate::loader::manager::ConfigManager;

/// Builder for creating a [`ConfigManager`] with custom overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    workspace: Option<PathBuf>,
    config_file: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    cli_overrides: Vec<(String, toml::Value)>,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace directory.
    pub fn workspace(mut self, path: PathBuf) -> Self {
        self.workspace = Some(path);
        self
    }

    /// Set a specific configuration file to use instead of the workspace layers.
    pub fn config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Read the user layer from this directory instead of the detected home.
    pub fn home_dir(mut self, path: PathBuf) -> Self {
        self.home_dir = Some(path);
        self
    }

    /// Add a CLI override (e.g., "params.host", "example.com").
    pub fn cli_override(mut self, key: String, value: toml::Value) -> Self {
        self.cli_overrides.push((key, value));
        self
    }

    /// Add multiple CLI overrides from string pairs.
    ///
    /// Values are parsed as TOML. If parsing fails, they are treated as strings.
    pub fn cli_overrides(mut self, overrides: &[(String, String)]) -> Self {
        for (key, value) in overrides {
            let toml_value = parse_override_value(value);
            self.cli_overrides.push((key.clone(), toml_value));
        }
        self
    }

    /// Build the [`ConfigManager`].
    pub fn build(self) -> Result<ConfigManager> {
        let mut manager = if let Some(config_file) = self.config_file {
            ConfigManager::load_from_file(config_file)?
        } else {
            let workspace = match self.workspace {
                Some(workspace) => workspace,
                None => std::env::current_dir()
                    .context("Failed to resolve the current directory as workspace")?,
            };
            let home = self.home_dir.or_else(dirs::home_dir);
            ConfigManager::load_from_workspace_with_home(workspace, home)?
        };

        if !self.cli_overrides.is_empty() {
            let mut runtime_toml = toml::Table::new();
            for (key, value) in self.cli_overrides {
                Self::insert_dotted_key(&mut runtime_toml, &key, value)?;
            }

            let runtime_layer =
                ConfigLayerEntry::new(ConfigLayerSource::Runtime, toml::Value::Table(runtime_toml));

            manager.layer_stack.push(runtime_layer);

            // Re-evaluate config
            manager.config = ConfigManager::evaluate(&manager.layer_stack)
                .context("Configuration failed validation after runtime overrides")?;
        }

        Ok(manager)
    }

    fn insert_dotted_key(table: &mut toml::Table, key: &str, value: toml::Value) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|part| part.trim().is_empty()) {
            bail!("Invalid override key `{key}`");
        }

        let mut current = table;
        let Some((last, parents)) = parts.split_last() else {
            bail!("Invalid override key `{key}`");
        };
        for part in parents {
            if current.get(*part).is_none_or(|value| !value.is_table()) {
                current.insert((*part).to_owned(), toml::Value::Table(toml::Table::new()));
            }
            current = match current.get_mut(*part).and_then(toml::Value::as_table_mut) {
                Some(table) => table,
                None => bail!("Override key `{key}` conflicts with a non-table value"),
            };
        }
        current.insert((*last).to_owned(), value);
        Ok(())
    }
}

/// Interpret an override value as TOML, falling back to a plain string.
fn parse_override_value(value: &str) -> toml::Value {
    let wrapped = format!("value = {value}");
    toml::from_str::<toml::Table>(&wrapped)
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_values_parse_as_toml_or_string() {
        assert_eq!(parse_override_value("false"), toml::Value::Boolean(false));
        assert_eq!(parse_override_value("\"quoted\""), toml::Value::String("quoted".to_owned()));
        assert_eq!(
            parse_override_value("example.com"),
            toml::Value::String("example.com".to_owned())
        );
    }

    #[test]
    fn dotted_keys_build_nested_tables() {
        let mut table = toml::Table::new();
        ConfigBuilder::insert_dotted_key(
            &mut table,
            "params.host",
            toml::Value::String("h".to_owned()),
        )
        .unwrap();
        ConfigBuilder::insert_dotted_key(&mut table, "output.pretty", toml::Value::Boolean(false))
            .unwrap();

        assert_eq!(table["params"]["host"].as_str(), Some("h"));
        assert_eq!(table["output"]["pretty"].as_bool(), Some(false));
    }

    #[test]
    fn empty_key_segments_are_rejected() {
        let mut table = toml::Table::new();
        assert!(
            ConfigBuilder::insert_dotted_key(&mut table, "params..host", toml::Value::Boolean(true))
                .is_err()
        );
    }
}
