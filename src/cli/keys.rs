use anyhow::Result;
use clap::Args;
use serde::Serialize;
use synthmon_config::{
    ConfigKey, PARAMS_KEYS_TO_SKIP, SynthmonConfig, UI_KEYS_TO_SKIP, UI_TO_HEARTBEAT_KEY_MAP,
    default_registry,
};

use super::print_json;

#[derive(Debug, Args)]
pub struct KeysArgs {
    /// Print the key table as JSON
    #[arg(long)]
    pub json: bool,
}

/// How the formatter treats one configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub key: &'static str,
    /// Dropped from heartbeat output.
    pub skipped: bool,
    /// Never receives `${param}` substitution.
    pub params_skipped: bool,
    /// Suppressed while TLS is disabled.
    pub tls: bool,
    pub has_formatter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_to: Option<&'static str>,
}

impl KeyInfo {
    pub fn describe(key: ConfigKey) -> Self {
        Self {
            key: key.as_str(),
            skipped: UI_KEYS_TO_SKIP.contains(&key),
            params_skipped: PARAMS_KEYS_TO_SKIP.contains(&key),
            tls: key.is_tls(),
            has_formatter: default_registry().contains(key),
            renamed_to: UI_TO_HEARTBEAT_KEY_MAP
                .iter()
                .find(|(from, _)| *from == key)
                .map(|(_, to)| *to),
        }
    }

    fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.skipped {
            flags.push("skipped".to_owned());
        }
        if self.params_skipped {
            flags.push("no-params".to_owned());
        }
        if self.tls {
            flags.push("tls".to_owned());
        }
        if self.has_formatter {
            flags.push("formatted".to_owned());
        }
        if let Some(target) = self.renamed_to {
            flags.push(format!("renamed:{target}"));
        }
        flags
    }
}

pub fn handle_keys_command(args: &KeysArgs, config: &SynthmonConfig) -> Result<()> {
    let keys: Vec<KeyInfo> = ConfigKey::ALL.iter().copied().map(KeyInfo::describe).collect();

    if args.json {
        return print_json(&keys, config.output.pretty);
    }

    for info in &keys {
        let flags = info.flags();
        if flags.is_empty() {
            println!("{}", info.key);
        } else {
            println!("{:<36} {}", info.key, flags.join(", "));
        }
    }
    Ok(())
}
