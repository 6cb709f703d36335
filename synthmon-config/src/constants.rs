/// Configuration file name looked up in the workspace and home directories.
pub const CONFIG_FILE_NAME: &str = "synthmon.toml";

/// Directory holding per-user and per-workspace configuration.
pub const CONFIG_DIR_NAME: &str = ".synthmon";

/// Explicit configuration file, bypassing layered discovery.
pub const ENV_CONFIG_PATH: &str = "SYNTHMON_CONFIG_PATH";

/// Workspace used for discovery instead of the current directory.
pub const ENV_WORKSPACE: &str = "SYNTHMON_WORKSPACE";

/// Tracing targets enabled when `[debug].trace_targets` is empty.
pub const DEFAULT_TRACE_TARGETS: &[&str] = &["synthmon", "synthmon_config", "synthmon::diagnostics"];
