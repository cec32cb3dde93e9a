//! Typed settings from layered files on disk.

use oplog_config::secrets::{DEFAULT_PASSWORD_ENV, DEFAULT_USER_ENV};
use oplog_config::{load_layered_yaml, load_layered_yaml_from_strings, Settings, TlsCertReqs};
use std::fs;

#[test]
fn defaults_apply_to_empty_config() {
    let loaded = load_layered_yaml_from_strings(&[]).unwrap();
    let s = Settings::from_config_json(&loaded.config_json).unwrap();

    assert_eq!(s.connection.host, "localhost");
    assert_eq!(s.connection.port, 27017);
    assert_eq!(s.connection.login_database, "admin");
    assert_eq!(s.connection.credentials_env.user_var, DEFAULT_USER_ENV);
    assert_eq!(s.connection.credentials_env.password_var, DEFAULT_PASSWORD_ENV);
    assert!(!s.connection.tls.enabled);
    assert_eq!(s.connection.tls.cert_reqs, TlsCertReqs::Required);
    assert_eq!(s.connection.server_selection_timeout_ms, None);
    assert_eq!(s.oplog.size_mb, None);
    assert!(!s.oplog.compact);
}

#[test]
fn layered_files_merge_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.yaml");
    let member = dir.path().join("rs0-c.yaml");
    fs::write(
        &base,
        "connection:\n  host: rs0-a\n  tls:\n    enabled: true\noplog:\n  size_mb: 16000\n",
    )
    .unwrap();
    fs::write(
        &member,
        "connection:\n  host: rs0-c\n  tls:\n    cert_reqs: CERT_NONE\noplog:\n  size_mb: 8000\n  compact: true\n",
    )
    .unwrap();

    let base_s = base.to_string_lossy().to_string();
    let member_s = member.to_string_lossy().to_string();
    let loaded = load_layered_yaml(&[base_s.as_str(), member_s.as_str()]).unwrap();
    let s = Settings::from_config_json(&loaded.config_json).unwrap();

    assert_eq!(s.connection.host, "rs0-c");
    assert!(s.connection.tls.enabled);
    assert_eq!(s.connection.tls.cert_reqs, TlsCertReqs::None);
    assert_eq!(s.oplog.size_mb, Some(8000));
    assert!(s.oplog.compact);
}

#[test]
fn missing_file_names_the_path() {
    let err = load_layered_yaml(&["/nonexistent/oplog/base.yaml"]).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/oplog/base.yaml"));
}

#[test]
fn wrong_types_are_config_invalid() {
    for yaml in [
        "connection:\n  port: \"27017\"\n",
        "connection:\n  port: 70000\n",
        "oplog:\n  compact: \"yes\"\n",
        "connection:\n  tls:\n    cert_reqs: CERT_SOMETIMES\n",
        "connection:\n  server_selection_timeout_ms: 0\n",
    ] {
        let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
        assert!(
            Settings::from_config_json(&loaded.config_json).is_err(),
            "expected rejection for: {yaml}"
        );
    }
}

#[test]
fn negative_size_is_kept_raw_for_later_validation() {
    let loaded = load_layered_yaml_from_strings(&["oplog:\n  size_mb: -5\n"]).unwrap();
    let s = Settings::from_config_json(&loaded.config_json).unwrap();
    assert_eq!(s.oplog.size_mb, Some(-5));
}
