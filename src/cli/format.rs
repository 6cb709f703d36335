use anyhow::{Context, Result, bail};
use clap::Args;
use synthmon_commons::TracingDiagnostics;
use synthmon_config::value::truthy_text;
use synthmon_config::{ConfigData, ConfigKey, MonitorFields, SynthmonConfig, format_configs};
use uuid::Uuid;

use super::MonitorInput;

#[derive(Debug, Args)]
pub struct FormatArgs {
    #[command(flatten)]
    pub input: MonitorInput,

    /// Config id reported in the heartbeat fields (defaults to the monitor's `config_id`)
    #[arg(long, value_name = "ID")]
    pub config_id: Option<String>,

    /// Heartbeat id overriding the monitor's `id`
    #[arg(long, value_name = "ID")]
    pub heartbeat_id: Option<String>,

    /// Mark the run as a one-off execution
    #[arg(long)]
    pub run_once: bool,

    /// Test run id attached to the heartbeat fields
    #[arg(long, value_name = "ID")]
    pub test_run_id: Option<String>,

    /// Attach a freshly generated test run id
    #[arg(long)]
    pub test_run: bool,
}

pub fn handle_format_command(args: &FormatArgs, config: &SynthmonConfig) -> Result<()> {
    if args.test_run && args.test_run_id.is_some() {
        bail!("--test-run cannot be combined with --test-run-id");
    }

    let batch = args.input.read_monitors()?;
    if args.heartbeat_id.is_some() && batch.monitors.len() > 1 {
        bail!("--heartbeat-id can only be used with a single monitor");
    }

    let params = args.input.global_params(config)?;
    let test_run_id = if args.test_run {
        Some(Uuid::new_v4().to_string())
    } else {
        args.test_run_id.clone()
    };

    let configs = batch
        .monitors
        .iter()
        .enumerate()
        .map(|(index, monitor)| {
            let config_id = resolve_config_id(args.config_id.as_deref(), monitor)
                .with_context(|| format!("monitor #{index} has no config id"))?;
            Ok(ConfigData {
                monitor: monitor.clone(),
                config_id,
                heartbeat_id: args.heartbeat_id.clone(),
                run_once: args.run_once.then_some(true),
                test_run_id: test_run_id.clone(),
                params: params.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let formatted = format_configs(&configs, &TracingDiagnostics);
    tracing::debug!(monitors = formatted.len(), "formatted monitors");
    batch.print(&formatted, config.output.pretty)
}

fn resolve_config_id(explicit: Option<&str>, monitor: &MonitorFields) -> Result<String> {
    if let Some(config_id) = explicit {
        return Ok(config_id.to_owned());
    }
    match truthy_text(monitor.get(ConfigKey::ConfigId)) {
        Some(config_id) => Ok(config_id),
        None => bail!("pass --config-id or set `config_id` on the monitor"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_id_wins() {
        let monitor = MonitorFields::new().with(ConfigKey::ConfigId, "from-monitor");
        assert_eq!(
            resolve_config_id(Some("explicit"), &monitor).unwrap(),
            "explicit"
        );
        assert_eq!(resolve_config_id(None, &monitor).unwrap(), "from-monitor");
    }

    #[test]
    fn missing_config_id_is_an_error() {
        let monitor = MonitorFields::new().with(ConfigKey::ConfigId, "");
        assert!(resolve_config_id(None, &monitor).is_err());
    }
}
