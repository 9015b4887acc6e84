#![allow(clippy::unwrap_used)]
// Config layering, persistence and translation.

use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;

use iotmon_config::{Config, ConfigError, load_config_file, load_config_from, save_config_to};
use iotmon_core::TlsVerification;

#[test]
fn missing_file_gives_defaults() {
    Jail::expect_with(|jail| {
        let config = load_config_from(&jail.directory().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:5001");
        assert_eq!(config.refresh_interval, 60);
        Ok(())
    });
}

#[test]
fn file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                api_url = "https://sensors.example.com"
                refresh_interval = 15
            "#,
        )?;

        let config = load_config_from(&jail.directory().join("config.toml")).unwrap();
        assert_eq!(config.api_url, "https://sensors.example.com");
        assert_eq!(config.refresh_interval, 15);
        assert_eq!(config.timeout, 30);
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", r#"api_url = "http://from-file:5001""#)?;
        jail.set_env("IOTMON_API_URL", "http://from-env:5001");
        jail.set_env("IOTMON_TIMEOUT", "5");

        let config = load_config_from(&jail.directory().join("config.toml")).unwrap();
        assert_eq!(config.api_url, "http://from-env:5001");
        assert_eq!(config.timeout, 5);
        Ok(())
    });
}

#[test]
fn file_only_load_ignores_environment() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "timeout = 12")?;
        jail.set_env("IOTMON_TIMEOUT", "5");

        let config = load_config_file(&jail.directory().join("config.toml")).unwrap();
        assert_eq!(config.timeout, 12);
        Ok(())
    });
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set("api_url", "http://10.0.0.5:5001").unwrap();
    config.set("output", "json").unwrap();
    save_config_to(&config, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("api_url = \"http://10.0.0.5:5001\""));

    let loaded: Config = toml::from_str(&text).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn set_rejects_bad_values() {
    let mut config = Config::default();
    assert!(matches!(
        config.set("refresh_interval", "0"),
        Err(ConfigError::Validation { .. })
    ));
    assert!(matches!(
        config.set("timeout", "soon"),
        Err(ConfigError::Validation { .. })
    ));
    assert!(matches!(
        config.set("api_url", "ftp://example.com"),
        Err(ConfigError::Validation { .. })
    ));
    assert!(matches!(
        config.set("colour", "never"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(config.get("nope").is_err());
}

#[test]
fn translates_to_monitor_config() {
    let mut config = Config::default();
    config.set("insecure", "true").unwrap();
    config.set("refresh_interval", "10").unwrap();

    let monitor = config.to_monitor_config().unwrap();
    assert_eq!(monitor.api_url.as_str(), "http://localhost:5001/");
    assert_eq!(monitor.tls, TlsVerification::DangerAcceptInvalid);
    assert_eq!(monitor.refresh_interval, Duration::from_secs(10));
    assert_eq!(monitor.timeout, Duration::from_secs(30));
}
