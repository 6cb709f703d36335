//! Monitor configuration formatting for synthetic monitors.
//!
//! The entry points mirror the dispatch flow of a monitor run:
//!
//! - [`mix_params_with_global_params`] layers a monitor's params blob over the
//!   global parameter defaults.
//! - [`format_heartbeat_request`] wraps a monitor into the dispatch envelope
//!   (`id`, `fields`, `fields_under_root`, `params`).
//! - [`format_monitor_config_fields`] turns a record into the heartbeat-ready
//!   form: per-key formatting, skip lists, TLS suppression, key renaming,
//!   `${param}` substitution and nil pruning.
//! - [`format_configs`] runs the three steps in order for a batch.
//!
//! ```
//! use serde_json::json;
//! use synthmon_commons::NoopDiagnostics;
//! use synthmon_config::{ConfigKey, MonitorFields, ParamsMap, format_monitor_config_fields};
//!
//! let monitor = MonitorFields::new()
//!     .with(ConfigKey::MonitorType, "http")
//!     .with(ConfigKey::Urls, "https://example.com")
//!     .with(ConfigKey::Timeout, "16");
//! let formatted = format_monitor_config_fields(
//!     &monitor.key_list(),
//!     &monitor,
//!     &NoopDiagnostics,
//!     &ParamsMap::new(),
//! );
//! assert_eq!(formatted.get("timeout"), Some(&json!("16s")));
//! ```
//!
//! The [`loader`] module reads the `synthmon.toml` layers used by the CLI.

pub mod constants;
pub mod debug;
pub mod format_configs;
pub mod formatters;
pub mod keys;
pub mod loader;
pub mod monitor;
pub mod params;
pub mod templating;
pub mod value;

pub use debug::{DebugConfig, TraceLevel};
pub use format_configs::{
    ConfigData, FormattedConfig, HeartbeatConfig, HeartbeatFields, HeartbeatRequest,
    PARAMS_KEYS_TO_SKIP, UI_KEYS_TO_SKIP, UI_TO_HEARTBEAT_KEY_MAP, format_config, format_configs,
    format_heartbeat_request, format_monitor_config_fields, format_monitor_config_fields_with,
};
pub use formatters::{Formatter, FormatterRegistry, default_registry};
pub use keys::{ConfigKey, MonitorType, UnknownConfigKey};
pub use loader::{ConfigBuilder, ConfigManager, OutputConfig, SynthmonConfig};
pub use monitor::{MonitorFields, MonitorFieldsError, ParsedMonitor};
pub use params::{MixedParams, ParamsMap, ParamsMerge, merge_monitor_params, mix_params_with_global_params};
pub use templating::{ParsedVar, TemplateError, replace_string_with_params};
