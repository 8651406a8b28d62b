//! Settings files and environment overrides.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use kvg_rgb::config::{ConfigFormat, Settings, load_settings, load_settings_from_str};
use kvg_rgb::error::RgbError;

use crate::common::env::{EnvGuard, without_kvg_env};

#[test]
fn toml_and_yaml_describe_the_same_settings() {
    let toml = r#"
[gateway]
host = "192.168.1.20"
port = 6800

[web]
port = 8080

[effects]
tick_ms = 33
"#;
    let yaml = r"
gateway:
  host: 192.168.1.20
  port: 6800
web:
  port: 8080
effects:
  tick_ms: 33
";
    let from_toml = load_settings_from_str(toml, ConfigFormat::Toml).unwrap();
    let from_yaml = load_settings_from_str(yaml, ConfigFormat::Yaml).unwrap();
    assert_eq!(from_toml, from_yaml);
    assert_eq!(from_toml.connection_options().addr(), "192.168.1.20:6800");
    assert_eq!(from_toml.web.bind, "127.0.0.1");
    assert_eq!(from_toml.effects.flash_interval_ms, 200);
}

#[test]
fn relative_paths_resolve_against_config_dir() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kvg.yaml");
    fs::write(&path, "store:\n  path: data/prefs.db\nweb:\n  static_dir: ui\n").unwrap();

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.store.path, Some(temp.path().join("data/prefs.db")));
    assert_eq!(settings.web.static_dir, Some(temp.path().join("ui")));
}

#[test]
fn invalid_values_are_rejected() {
    for content in [
        "[gateway]\nport = 0\n",
        "[effects]\ntick_ms = 0\n",
        "[web]\nbind = \"not an address\"\n",
        "[gateway\n",
    ] {
        let err = load_settings_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, RgbError::ConfigParse(_)), "{content}: {err}");
    }
}

#[test]
fn explicit_missing_file_is_not_found() {
    let _env = without_kvg_env();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.toml");
    let err = Settings::load(Some(missing.as_path())).unwrap_err();
    assert!(matches!(err, RgbError::ConfigNotFound { .. }));
}

#[test]
fn environment_overrides_file_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[gateway]\nhost = \"10.0.0.2\"\nport = 6800\n").unwrap();

    let _env = EnvGuard::set_all(&[
        ("KVG_HOST", Some("10.0.0.9")),
        ("KVG_PORT", Some("7000")),
        ("KVG_DB", Some("/tmp/kvg-test.db")),
    ]);
    let (settings, source) = Settings::load(Some(path.as_path())).unwrap();

    assert_eq!(source, Some(path));
    assert_eq!(settings.gateway.host, "10.0.0.9");
    assert_eq!(settings.gateway.port, 7000);
    assert_eq!(settings.store.path, Some(PathBuf::from("/tmp/kvg-test.db")));
}

#[test]
fn malformed_port_env_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "").unwrap();

    let _env = EnvGuard::set("KVG_PORT", "67420");
    let err = Settings::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, RgbError::ConfigParse(_)));
}

#[test]
fn settings_round_trip_through_toml_output() {
    let mut settings = Settings::default();
    settings.gateway.port = 6900;
    settings.store.recent_colors_limit = 5;
    let text = settings.to_toml().unwrap();
    let parsed = load_settings_from_str(&text, ConfigFormat::Toml).unwrap();
    assert_eq!(parsed, settings);
}
