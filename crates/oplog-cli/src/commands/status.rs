//! `oplog status`: read-only probe of size and role.

use oplog_reconcile::{AdminClient, ReconcileError, TopologyOracle};
use serde_json::{json, Value};
use std::process::ExitCode;

use super::{credentials, fail, load_settings, print_json, ConnectionOverrides};

pub fn run(conn: ConnectionOverrides) -> ExitCode {
    match load_settings(&conn).and_then(|settings| probe(&settings)) {
        Ok(v) => {
            print_json(&v);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn probe(settings: &oplog_config::Settings) -> Result<Value, ReconcileError> {
    let creds = credentials(settings)?;
    let member = oplog_mongo::connect(&settings.connection, creds.as_ref())?;

    let size_mb = member.oplog_size_mb().map_err(|e| {
        ReconcileError::state_read(format!("Unable to get current oplog size: {e}"))
    })?;
    let role = member
        .member_role()
        .map_err(|e| ReconcileError::state_read(format!("Unable to get member state: {e}")))?;

    Ok(json!({
        "host": settings.connection.host,
        "port": settings.connection.port,
        "oplog_size_mb": size_mb,
        "member_role": role.as_str(),
    }))
}
