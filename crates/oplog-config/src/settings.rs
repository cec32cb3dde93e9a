//! Typed view of the merged config.
//!
//! Every pointer read here must be listed in [`crate::CONSUMED_POINTERS`].

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::secrets::CredentialEnvNames;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_LOGIN_DATABASE: &str = "admin";

/// Peer certificate policy for TLS connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TlsCertReqs {
    /// Do not validate the server certificate.
    #[serde(rename = "CERT_NONE")]
    None,
    /// Validate only if presented. The driver cannot express "optional", so
    /// this is treated like `None` on the wire.
    #[serde(rename = "CERT_OPTIONAL")]
    Optional,
    #[default]
    #[serde(rename = "CERT_REQUIRED")]
    Required,
}

impl TlsCertReqs {
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsCertReqs::None => "CERT_NONE",
            TlsCertReqs::Optional => "CERT_OPTIONAL",
            TlsCertReqs::Required => "CERT_REQUIRED",
        }
    }

    pub fn allows_invalid_certificates(&self) -> bool {
        !matches!(self, TlsCertReqs::Required)
    }
}

impl fmt::Display for TlsCertReqs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TlsCertReqs {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CERT_NONE" => Ok(TlsCertReqs::None),
            "CERT_OPTIONAL" => Ok(TlsCertReqs::Optional),
            "CERT_REQUIRED" => Ok(TlsCertReqs::Required),
            other => bail!(
                "invalid cert_reqs '{}'. expected one of: CERT_NONE | CERT_OPTIONAL | CERT_REQUIRED",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub enabled: bool,
    pub cert_reqs: TlsCertReqs,
}

/// Where and how to connect. Credentials are referenced by env var name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub login_database: String,
    pub credentials_env: CredentialEnvNames,
    pub tls: TlsSettings,
    /// Transport deadline for picking a server; driver default when `None`.
    pub server_selection_timeout_ms: Option<u64>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            login_database: DEFAULT_LOGIN_DATABASE.to_string(),
            credentials_env: CredentialEnvNames::default(),
            tls: TlsSettings::default(),
            server_selection_timeout_ms: None,
        }
    }
}

/// Desired oplog state as configured. Size is left raw (signed) so range
/// checking happens in one place, at `DesiredConfig` construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OplogSettings {
    pub size_mb: Option<i64>,
    pub compact: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub oplog: OplogSettings,
}

impl Settings {
    /// Parse the merged config. Absent keys take defaults; present keys of
    /// the wrong type are an error (CONFIG_INVALID).
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        let d = ConnectionSettings::default();

        let host = opt_str(config_json, "/connection/host")?.unwrap_or(d.host);
        let port = match opt_i64(config_json, "/connection/port")? {
            Some(p) => match u16::try_from(p) {
                Ok(p) if p > 0 => p,
                _ => bail!("CONFIG_INVALID leaf=/connection/port: {p} is not a valid TCP port"),
            },
            None => d.port,
        };
        let login_database =
            opt_str(config_json, "/connection/login_database")?.unwrap_or(d.login_database);

        let tls = TlsSettings {
            enabled: opt_bool(config_json, "/connection/tls/enabled")?.unwrap_or(false),
            cert_reqs: match opt_str(config_json, "/connection/tls/cert_reqs")? {
                Some(s) => s.parse()?,
                None => TlsCertReqs::default(),
            },
        };

        let server_selection_timeout_ms =
            match opt_i64(config_json, "/connection/server_selection_timeout_ms")? {
                Some(ms) if ms > 0 => Some(ms as u64),
                Some(ms) => bail!(
                    "CONFIG_INVALID leaf=/connection/server_selection_timeout_ms: {ms} must be > 0"
                ),
                None => None,
            };

        let oplog = OplogSettings {
            size_mb: opt_i64(config_json, "/oplog/size_mb")?,
            compact: opt_bool(config_json, "/oplog/compact")?.unwrap_or(false),
        };

        Ok(Settings {
            connection: ConnectionSettings {
                host,
                port,
                login_database,
                credentials_env: CredentialEnvNames::from_config_json(config_json),
                tls,
                server_selection_timeout_ms,
            },
            oplog,
        })
    }
}

fn opt_str(v: &Value, ptr: &str) -> Result<Option<String>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => bail!("CONFIG_INVALID leaf={ptr}: expected string, got {other}"),
    }
}

fn opt_i64(v: &Value, ptr: &str) -> Result<Option<i64>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => bail!("CONFIG_INVALID leaf={ptr}: expected integer, got {n}"),
        },
        Some(other) => bail!("CONFIG_INVALID leaf={ptr}: expected integer, got {other}"),
    }
}

fn opt_bool(v: &Value, ptr: &str) -> Result<Option<bool>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => bail!("CONFIG_INVALID leaf={ptr}: expected bool, got {other}"),
    }
}
