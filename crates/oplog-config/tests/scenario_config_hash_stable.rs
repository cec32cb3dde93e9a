//! Config hash stability.
//!
//! GREEN when:
//! - The same layers hash identically on every load.
//! - Key order inside a document does not change the hash.
//! - Different values produce different hashes.
//! - Later layers override earlier ones.

use oplog_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
connection:
  host: "rs0-a.internal"
  port: 27017
  login_database: "admin"
  credentials_env:
    user: "RS0_LOGIN_USER"
    password: "RS0_LOGIN_PASSWORD"
oplog:
  size_mb: 16000
  compact: false
"#;

const BASE_YAML_REORDERED: &str = r#"
oplog:
  compact: false
  size_mb: 16000
connection:
  credentials_env:
    password: "RS0_LOGIN_PASSWORD"
    user: "RS0_LOGIN_USER"
  login_database: "admin"
  port: 27017
  host: "rs0-a.internal"
"#;

const SHRINK_OVERLAY: &str = r#"
oplog:
  size_mb: 8000
  compact: true
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn overlay_overrides_base_and_changes_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, SHRINK_OVERLAY]).unwrap();

    assert_ne!(base.config_hash, merged.config_hash);
    assert_eq!(
        merged.config_json.pointer("/oplog/size_mb").and_then(|v| v.as_i64()),
        Some(8000)
    );
    assert_eq!(
        merged.config_json.pointer("/oplog/compact").and_then(|v| v.as_bool()),
        Some(true)
    );
    // Untouched base keys survive the merge.
    assert_eq!(
        merged.config_json.pointer("/connection/host").and_then(|v| v.as_str()),
        Some("rs0-a.internal")
    );
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn no_layers_is_an_empty_object() {
    let a = load_layered_yaml_from_strings(&[]).unwrap();
    let b = load_layered_yaml_from_strings(&["{}"]).unwrap();
    assert_eq!(a.canonical_json, "{}");
    assert_eq!(a.config_hash, b.config_hash);
}
