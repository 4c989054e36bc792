//! # 配置加载测试

use super::{AppConfig, ConfigManager};
use crate::error::QmsError;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    ConfigManager::collect_overrides(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
    )
}

#[test]
fn test_defaults_are_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.server.port, 5001);
    assert_eq!(config.identity.default_actor_id, 1);
    assert!(config.server.allows_any_origin());
    assert!(!config.seed.on_startup);
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let file = write_config(
        r#"
[server]
port = 8088

[database]
url = "sqlite://./target/test.db"
"#,
    );

    let manager = ConfigManager::from_file(file.path(), &HashMap::new()).unwrap();
    let config = manager.get_config();

    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.database.url, "sqlite://./target/test.db");
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(manager.source(), Some(file.path()));
}

#[test]
fn test_env_overrides_applied() {
    let file = write_config("[server]\nport = 8088\n");
    let env = overrides(&[
        ("QMS_SERVER_PORT", "9100"),
        ("QMS_SERVER_CORS_ORIGINS", "http://a.local, http://b.local"),
        ("QMS_IDENTITY_DEFAULT_ACTOR_ID", "3"),
        ("QMS_SEED_ON_STARTUP", "true"),
        ("QMS_CONFIG_PATH", "ignored.toml"),
        ("PATH", "/usr/bin"),
    ]);

    let config = ConfigManager::from_file(file.path(), &env).unwrap().get_config();

    assert_eq!(config.server.port, 9100);
    assert_eq!(
        config.server.cors_origins,
        vec!["http://a.local".to_string(), "http://b.local".to_string()]
    );
    assert!(!config.server.allows_any_origin());
    assert_eq!(config.identity.default_actor_id, 3);
    assert!(config.seed.on_startup);
}

#[test]
fn test_invalid_override_is_config_error() {
    let env = overrides(&[("QMS_SERVER_PORT", "not-a-port")]);
    let err = ConfigManager::from_config(AppConfig::default(), &env).unwrap_err();
    assert!(matches!(err, QmsError::Config { .. }));
}

#[test]
fn test_validation_rejects_zero_actor() {
    let file = write_config("[identity]\ndefault_actor_id = 0\n");
    let err = ConfigManager::from_file(file.path(), &HashMap::new()).unwrap_err();
    assert!(err.to_string().contains("默认操作人ID必须大于0"));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = ConfigManager::new(Some(&missing)).unwrap_err();
    assert!(matches!(err, QmsError::Config { .. }));
}

#[test]
fn test_sqlite_file_path() {
    let mut db = super::DatabaseConfig::default();
    assert_eq!(
        db.sqlite_file_path().unwrap(),
        std::path::PathBuf::from("./data/qms.db")
    );

    db.url = "sqlite://data/qms.db?mode=rwc".to_string();
    assert_eq!(
        db.sqlite_file_path().unwrap(),
        std::path::PathBuf::from("data/qms.db")
    );

    db.url = "sqlite::memory:".to_string();
    assert!(db.is_memory_database());
    assert!(db.sqlite_file_path().is_none());
}

#[test]
fn test_ensure_database_path_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_file = dir.path().join("nested").join("qms.db");
    let db = super::DatabaseConfig {
        url: format!("sqlite://{}", db_file.display()),
        ..Default::default()
    };

    db.ensure_database_path().unwrap();
    assert!(db_file.exists());
}
