//! Connecting to a port nothing listens on fails as a connectivity error,
//! within the configured server-selection deadline.

use oplog_config::ConnectionSettings;
use oplog_reconcile::FailureKind;

#[test]
fn closed_port_is_connectivity_error() {
    let settings = ConnectionSettings {
        host: "127.0.0.1".to_string(),
        port: 1,
        server_selection_timeout_ms: Some(300),
        ..ConnectionSettings::default()
    };

    let err = oplog_mongo::connect(&settings, None).unwrap_err();
    assert_eq!(err.kind, FailureKind::Connectivity);
    assert!(
        err.message.starts_with("Unable to connect to MongoDB: "),
        "got: {}",
        err.message
    );
}
