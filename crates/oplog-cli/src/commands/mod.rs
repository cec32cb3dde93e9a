//! Command handler modules for oplog-cli.
//!
//! Shared config/connection plumbing lives here; command-specific logic
//! lives in the submodules.

pub mod resize;
pub mod status;

use anyhow::{bail, Result};
use oplog_config::secrets::{resolve_credentials, LoginCredentials};
use oplog_config::{report_unused_keys, Settings, UnusedKeyPolicy};
use oplog_reconcile::ReconcileError;
use serde_json::Value;
use std::process::ExitCode;
use tracing::info;

/// Command-line connection flags; each `Some`/`true` overrides the config.
pub struct ConnectionOverrides {
    pub config_paths: Vec<String>,
    pub strict_config: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub login_database: Option<String>,
    pub login_user_env: Option<String>,
    pub login_password_env: Option<String>,
    pub tls: bool,
    pub tls_cert_reqs: Option<String>,
    pub server_selection_timeout_ms: Option<u64>,
}

pub struct ResizeRequest {
    pub conn: ConnectionOverrides,
    pub size_mb: Option<i64>,
    pub compact: bool,
    pub check: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config, lint unused keys, then apply command-line overrides.
///
/// Any problem here is malformed input and surfaces as a ValidationError,
/// before a connection is attempted.
pub fn load_settings(conn: &ConnectionOverrides) -> Result<Settings, ReconcileError> {
    layered_settings(conn).map_err(|e| ReconcileError::validation(format!("{e:#}")))
}

fn layered_settings(conn: &ConnectionOverrides) -> Result<Settings> {
    let path_refs: Vec<&str> = conn.config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = oplog_config::load_layered_yaml(&path_refs)?;

    let policy = if conn.strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    report_unused_keys(&loaded.config_json, policy)?;

    let mut settings = Settings::from_config_json(&loaded.config_json)?;
    if !conn.config_paths.is_empty() {
        info!(config_hash = %loaded.config_hash, layers = conn.config_paths.len(), "config loaded");
    }

    let c = &mut settings.connection;
    if let Some(host) = &conn.host {
        c.host = host.clone();
    }
    if let Some(port) = conn.port {
        if port == 0 {
            bail!("CONFIG_INVALID --port: 0 is not a valid TCP port");
        }
        c.port = port;
    }
    if let Some(db) = &conn.login_database {
        c.login_database = db.clone();
    }
    if let Some(var) = &conn.login_user_env {
        c.credentials_env.user_var = var.clone();
    }
    if let Some(var) = &conn.login_password_env {
        c.credentials_env.password_var = var.clone();
    }
    if conn.tls {
        c.tls.enabled = true;
    }
    if let Some(reqs) = &conn.tls_cert_reqs {
        c.tls.cert_reqs = reqs.parse()?;
    }
    if let Some(ms) = conn.server_selection_timeout_ms {
        c.server_selection_timeout_ms = Some(ms);
    }

    Ok(settings)
}

/// Resolve credentials; a half-supplied pair is a validation failure.
pub fn credentials(settings: &Settings) -> Result<Option<LoginCredentials>, ReconcileError> {
    resolve_credentials(&settings.connection.credentials_env)
        .map_err(|e| ReconcileError::validation(e.to_string()))
}

pub fn print_json(v: &Value) {
    println!("{v}");
}

/// Print the structured failure on stdout and map it to exit code 1.
pub fn fail(err: &ReconcileError) -> ExitCode {
    tracing::error!(kind = %err.kind, "{}", err.message);
    print_json(&err.to_json());
    ExitCode::FAILURE
}
