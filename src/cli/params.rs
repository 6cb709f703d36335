use anyhow::Result;
use synthmon_config::{MixedParams, SynthmonConfig, mix_params_with_global_params};

use super::MonitorInput;

pub fn handle_params_command(input: &MonitorInput, config: &SynthmonConfig) -> Result<()> {
    let batch = input.read_monitors()?;
    let global = input.global_params(config)?;

    let mixed: Vec<MixedParams> = batch
        .monitors
        .iter()
        .map(|monitor| mix_params_with_global_params(Some(&global), monitor))
        .collect();

    batch.print(&mixed, config.output.pretty)
}
