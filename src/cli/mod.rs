use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use synthmon_config::constants::{ENV_CONFIG_PATH, ENV_WORKSPACE};
use synthmon_config::{ConfigBuilder, ConfigManager, MonitorFields, ParamsMap, SynthmonConfig};

pub mod format;
pub mod keys;
pub mod params;

const STDIN_PATH: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "synthmon")]
#[command(about = "Format synthetic monitor configurations into heartbeat-ready records")]
#[command(version)]
pub struct Cli {
    /// Configuration file to load instead of the workspace layers
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Workspace directory searched for synthmon.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Override a configuration value, e.g. `-c params.host=example.com`
    #[arg(
        short = 'c',
        long = "config-override",
        global = true,
        value_name = "KEY=VALUE",
        value_parser = parse_override_pair
    )]
    pub config_overrides: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Format monitor records into heartbeat configurations
    Format(format::FormatArgs),
    /// Show the params produced by merging global and monitor params
    Params(MonitorInput),
    /// List the recognized configuration keys
    Keys(keys::KeysArgs),
}

/// Monitor records plus the optional global params file.
#[derive(Debug, Args)]
pub struct MonitorInput {
    /// Monitor JSON (an object or an array of objects), `-` reads stdin
    #[arg(long, value_name = "FILE|-")]
    pub monitor: PathBuf,

    /// JSON object of params layered over `[params]` from the configuration
    #[arg(long, value_name = "FILE")]
    pub global_params: Option<PathBuf>,
}

/// Monitors read from one input, remembering whether it was a list.
#[derive(Debug)]
pub struct MonitorBatch {
    pub monitors: Vec<MonitorFields>,
    pub is_list: bool,
}

impl Cli {
    pub fn load_config(&self) -> Result<ConfigManager> {
        let workspace = match self.workspace.clone().or_else(|| env_path(ENV_WORKSPACE)) {
            Some(workspace) => {
                ensure!(
                    workspace.is_dir(),
                    "Workspace path does not exist: {}",
                    workspace.display()
                );
                workspace
            }
            None => std::env::current_dir().context("Failed to resolve the current directory")?,
        };

        let mut builder = ConfigBuilder::new().workspace(workspace);
        if let Some(config_file) = self.config.clone().or_else(|| env_path(ENV_CONFIG_PATH)) {
            builder = builder.config_file(config_file);
        }
        if !self.config_overrides.is_empty() {
            builder = builder.cli_overrides(&self.config_overrides);
        }
        builder.build()
    }
}

impl MonitorInput {
    pub fn read_monitors(&self) -> Result<MonitorBatch> {
        let raw = read_input(&self.monitor)?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid JSON", self.monitor.display()))?;

        let (items, is_list) = match value {
            Value::Array(items) => (items, true),
            other => (vec![other], false),
        };

        let monitors = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let parsed = MonitorFields::from_value(item)
                    .with_context(|| format!("monitor #{index} is invalid"))?;
                if !parsed.ignored_keys.is_empty() {
                    tracing::warn!(
                        monitor = index,
                        ignored = ?parsed.ignored_keys,
                        "ignoring unrecognized monitor keys"
                    );
                }
                Ok(parsed.fields)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MonitorBatch { monitors, is_list })
    }

    /// `[params]` from the configuration with the params file applied on top.
    pub fn global_params(&self, config: &SynthmonConfig) -> Result<ParamsMap> {
        let mut params = config.params.clone();
        if let Some(path) = &self.global_params {
            let raw = read_input(path)?;
            let extra: ParamsMap = serde_json::from_str(&raw).with_context(|| {
                format!("{} must contain a JSON object of params", path.display())
            })?;
            params.extend(extra);
        }
        Ok(params)
    }
}

impl MonitorBatch {
    /// Print one output per monitor, shaped like the input.
    pub fn print<T: Serialize>(&self, outputs: &[T], pretty: bool) -> Result<()> {
        if self.is_list {
            return print_json(&outputs, pretty);
        }
        match outputs.first() {
            Some(output) => print_json(output, pretty),
            None => Ok(()),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn parse_override_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "overrides must be in KEY=VALUE form".to_owned())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("overrides must be in KEY=VALUE form".to_owned());
    }
    Ok((key.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn override_pairs_split_on_first_equals() {
        assert_eq!(
            parse_override_pair("params.url=https://x?a=b"),
            Ok(("params.url".to_owned(), "https://x?a=b".to_owned()))
        );
        assert!(parse_override_pair("missing").is_err());
        assert!(parse_override_pair(" =value").is_err());
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from([
            "synthmon",
            "-c",
            "output.pretty=false",
            "params",
            "--monitor",
            "-",
            "--workspace",
            "/tmp",
        ])
        .unwrap();
        assert_eq!(cli.config_overrides.len(), 1);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp")));
        assert!(matches!(cli.command, Commands::Params(_)));
    }
}
