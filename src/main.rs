//! synthmon - synthetic monitor heartbeat formatter
//!
//! Thin binary entry point that delegates to modular CLI handlers.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use synthmon_config::SynthmonConfig;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> Result<()> {
    let args = Cli::parse();

    // RUST_LOG takes precedence over the [debug] section
    let env_tracing = initialize_tracing_from_env()?;

    let manager = args.load_config()?;
    let config = manager.config();
    if !env_tracing {
        initialize_tracing_from_config(config)?;
    }
    if let Some(path) = manager.config_path() {
        tracing::debug!(config_path = %path.display(), "using configuration file");
    }

    match &args.command {
        Commands::Format(format_args) => cli::format::handle_format_command(format_args, config),
        Commands::Params(input) => cli::params::handle_params_command(input, config),
        Commands::Keys(keys_args) => cli::keys::handle_keys_command(keys_args, config),
    }
}

fn initialize_tracing_from_env() -> Result<bool> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(false);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))?;
    Ok(true)
}

fn initialize_tracing_from_config(config: &SynthmonConfig) -> Result<()> {
    let debug_cfg = &config.debug;
    let filter_str = if debug_cfg.enable_tracing {
        debug_cfg.filter_directives()
    } else {
        DEFAULT_LOG_FILTER.to_owned()
    };

    let filter = EnvFilter::try_new(&filter_str)
        .with_context(|| format!("invalid trace filter `{filter_str}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug_cfg.enable_tracing)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))?;

    if debug_cfg.enable_tracing {
        tracing::info!(
            "Debug tracing enabled: filter={}, level={}",
            filter_str,
            debug_cfg.trace_level
        );
    }

    Ok(())
}
