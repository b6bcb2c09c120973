//! Loading configuration files from disk.

use std::io::Write;

use surebet::app::config::{Config, StorageBackend};
use surebet::domain::Sport;
use surebet::error::{ConfigError, Error};
use surebet::port::{AdminAction, Authorizer};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn example_config_loads_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");

    let config = Config::load(path).unwrap();

    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.schedule.interval_secs, 1800);
    assert_eq!(config.source.feeds_for(&[Sport::Football]).len(), 3);
    assert_eq!(config.admin.allowed_actions.len(), AdminAction::ALL.len());
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::load("/nonexistent/surebet.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn load_validates_after_parsing() {
    let file = write_config("[storage]\nretention_days = 0\n");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "storage.retention_days",
            ..
        })
    ));
}

#[test]
fn feed_without_keys_is_rejected() {
    let file = write_config("[[source.feeds]]\nsport = \"darts\"\nkeys = []\n");
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn unknown_sport_fails_to_parse() {
    let file = write_config("[[source.feeds]]\nsport = \"curling\"\nkeys = [\"x\"]\n");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn admin_allow_list_restricts_actions() {
    let file = write_config("[admin]\nallowed_actions = [\"export_ledger\"]\n");
    let authorizer = Config::load(file.path()).unwrap().admin.authorizer();

    assert!(authorizer.authorize(AdminAction::ExportLedger));
    assert!(!authorizer.authorize(AdminAction::ClearLedger));
}

#[test]
fn api_key_never_comes_from_the_file() {
    let file = write_config("[source]\napi_key = \"from-file\"\n");
    let config = Config::load(file.path()).unwrap();
    assert_ne!(config.source.api_key.as_deref(), Some("from-file"));
}
