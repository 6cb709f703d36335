use assert_fs::TempDir;
use assert_fs::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;
use synthmon_config::constants::ENV_CONFIG_PATH;
use synthmon_config::debug::TraceLevel;
use synthmon_config::loader::layers::ConfigLayerSource;
use synthmon_config::{ConfigBuilder, ConfigManager};

#[test]
fn missing_files_yield_defaults() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let manager =
        ConfigManager::load_from_workspace_with_home(workspace.path(), Some(home.path().into()))
            .unwrap();

    assert!(manager.layer_stack().layers().is_empty());
    assert!(manager.config_path().is_none());
    assert!(manager.config().params.is_empty());
    assert!(manager.config().output.pretty);
    assert_eq!(manager.config().debug.trace_level, TraceLevel::Warn);
}

#[test]
fn workspace_file_overrides_user_file() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    home.child(".synthmon/synthmon.toml")
        .write_str("[params]\nhost = \"user.example\"\nuser = \"alice\"\n\n[output]\npretty = false\n")
        .unwrap();
    workspace
        .child("synthmon.toml")
        .write_str("[params]\nhost = \"workspace.example\"\n")
        .unwrap();

    let manager =
        ConfigManager::load_from_workspace_with_home(workspace.path(), Some(home.path().into()))
            .unwrap();
    let config = manager.config();

    assert_eq!(config.params.get("host"), Some(&json!("workspace.example")));
    assert_eq!(config.params.get("user"), Some(&json!("alice")));
    assert!(!config.output.pretty);
    assert_eq!(manager.layer_stack().layers().len(), 2);
    assert_eq!(
        manager.config_path(),
        Some(workspace.child("synthmon.toml").path())
    );
}

#[test]
fn workspace_root_file_overrides_config_dir_file() {
    let workspace = TempDir::new().unwrap();

    workspace
        .child(".synthmon/synthmon.toml")
        .write_str("[debug]\ntrace_level = \"debug\"\n[params]\nenv = \"staging\"\n")
        .unwrap();
    workspace
        .child("synthmon.toml")
        .write_str("[params]\nenv = \"prod\"\n")
        .unwrap();

    let manager = ConfigManager::load_from_workspace_with_home(workspace.path(), None).unwrap();

    assert_eq!(manager.config().params.get("env"), Some(&json!("prod")));
    assert_eq!(manager.config().debug.trace_level, TraceLevel::Debug);
    let sources: Vec<_> = manager
        .layer_stack()
        .layers()
        .iter()
        .map(|layer| matches!(layer.source, ConfigLayerSource::Workspace { .. }))
        .collect();
    assert_eq!(sources, vec![true, true]);
}

#[test]
fn cli_overrides_win_over_files() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    workspace
        .child("synthmon.toml")
        .write_str("[params]\nhost = \"workspace.example\"\n")
        .unwrap();

    let manager = ConfigBuilder::new()
        .workspace(workspace.path().to_path_buf())
        .home_dir(home.path().to_path_buf())
        .cli_overrides(&[
            ("params.host".to_owned(), "cli.example".to_owned()),
            ("output.pretty".to_owned(), "false".to_owned()),
        ])
        .build()
        .unwrap();

    assert_eq!(
        manager.config().params.get("host"),
        Some(&json!("cli.example"))
    );
    assert!(!manager.config().output.pretty);
    assert!(matches!(
        manager.layer_stack().layers().last().map(|layer| &layer.source),
        Some(ConfigLayerSource::Runtime)
    ));
}

#[test]
fn invalid_trace_targets_fail_validation() {
    let workspace = TempDir::new().unwrap();
    workspace
        .child("synthmon.toml")
        .write_str("[debug]\ntrace_targets = [\"synthmon=debug\"]\n")
        .unwrap();

    let err = ConfigManager::load_from_workspace_with_home(workspace.path(), None).unwrap_err();
    assert!(format!("{err:#}").contains("bare target path"));
}

#[test]
fn override_breaking_validation_is_rejected() {
    let workspace = TempDir::new().unwrap();

    let err = ConfigBuilder::new()
        .workspace(workspace.path().to_path_buf())
        .home_dir(workspace.path().to_path_buf())
        .cli_overrides(&[("params.retries".to_owned(), "3".to_owned())])
        .build()
        .unwrap_err();
    assert!(format!("{err:#}").contains("params.retries must be a string"));
}

#[test]
fn malformed_file_reports_its_path() {
    let workspace = TempDir::new().unwrap();
    let file = workspace.child("broken.toml");
    file.write_str("[params\n").unwrap();

    let err = ConfigManager::load_from_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"));
}

#[test]
#[serial]
fn config_path_env_selects_explicit_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("custom.toml");
    file.write_str("[params]\nsource = \"env\"\n").unwrap();

    // SAFETY: the test is serialized so no other thread reads the environment.
    unsafe { std::env::set_var(ENV_CONFIG_PATH, file.path()) };
    let result = ConfigManager::load();
    // SAFETY: see above.
    unsafe { std::env::remove_var(ENV_CONFIG_PATH) };

    let manager = result.unwrap();
    assert_eq!(manager.config().params.get("source"), Some(&json!("env")));
    assert!(matches!(
        manager.layer_stack().layers().first().map(|layer| &layer.source),
        Some(ConfigLayerSource::File { .. })
    ));
}
