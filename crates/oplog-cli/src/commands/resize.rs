//! `oplog resize`

use oplog_reconcile::{reconcile, DesiredConfig, ReconcileError, ReconciliationResult};
use std::process::ExitCode;

use super::{credentials, fail, load_settings, print_json, ResizeRequest};

pub fn run(req: ResizeRequest) -> ExitCode {
    match load_settings(&req.conn).and_then(|settings| execute(&req, &settings)) {
        Ok(result) => {
            print_json(&result.to_json());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Validate everything locally, then connect and reconcile.
fn execute(
    req: &ResizeRequest,
    settings: &oplog_config::Settings,
) -> Result<ReconciliationResult, ReconcileError> {
    let size_mb = req.size_mb.or(settings.oplog.size_mb).ok_or_else(|| {
        ReconcileError::validation("oplog_size_mb is required (--size-mb or oplog.size_mb)")
    })?;
    let desired = DesiredConfig::new(size_mb, req.compact || settings.oplog.compact, req.check)?;
    let creds = credentials(settings)?;

    let member = oplog_mongo::connect(&settings.connection, creds.as_ref())?;
    reconcile(&member, &desired)
}
