use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ReconcileError;

/// Bytes per megabyte as used by the server's `maxSize` reporting (1024²).
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a raw `maxSize` byte count into (possibly fractional) megabytes.
pub fn size_mb_from_bytes(bytes: f64) -> f64 {
    bytes / 1024.0 / 1024.0
}

/// Replication role of the connected member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Primary,
    Secondary,
    /// Arbiter, startup, recovering, rollback, ...
    Other,
}

impl MemberRole {
    /// Map a replica-set `myState` code onto a role.
    pub fn from_state_code(code: i64) -> Self {
        match code {
            1 => MemberRole::Primary,
            2 => MemberRole::Secondary,
            _ => MemberRole::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Primary => "PRIMARY",
            MemberRole::Secondary => "SECONDARY",
            MemberRole::Other => "OTHER",
        }
    }

    pub fn is_secondary(&self) -> bool {
        matches!(self, MemberRole::Secondary)
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired state for one reconciliation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredConfig {
    /// Target oplog size in whole megabytes. Must be > 0.
    pub oplog_size_mb: u64,
    /// Compact `local.oplog.rs` after a shrink (SECONDARY members only).
    pub compact: bool,
    /// Report what would happen without touching the member.
    pub check_only: bool,
}

impl DesiredConfig {
    /// Build a validated config from a raw (possibly signed) size.
    pub fn new(oplog_size_mb: i64, compact: bool, check_only: bool) -> Result<Self, ReconcileError> {
        if oplog_size_mb <= 0 {
            return Err(ReconcileError::validation(format!(
                "oplog_size_mb must be a positive integer, got {oplog_size_mb}"
            )));
        }
        let cfg = Self {
            oplog_size_mb: oplog_size_mb as u64,
            compact,
            check_only,
        };
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.oplog_size_mb == 0 {
            return Err(ReconcileError::validation(
                "oplog_size_mb must be a positive integer, got 0",
            ));
        }
        Ok(())
    }

    pub fn oplog_size_mb_f64(&self) -> f64 {
        self.oplog_size_mb as f64
    }
}

/// What was read from the member during a run. Never cached across runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservedState {
    pub current_oplog_size_mb: f64,
    pub member_role: MemberRole,
}

/// Terminal state of a successful run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Size already matched; nothing read beyond the size, nothing written.
    AlreadySized,
    /// Check-only run; the reported result is a simulation.
    Simulated,
    /// Resize applied, no compaction.
    Resized,
    /// Resize applied, then the oplog collection was compacted.
    ResizedAndCompacted,
}

/// Result of one reconciliation run. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    changed: bool,
    compacted: bool,
    #[serde(rename = "msg")]
    message: String,
    #[serde(skip)]
    outcome: Option<Outcome>,
}

impl ReconciliationResult {
    pub(crate) fn already_sized(desired_mb: u64) -> Self {
        Self {
            changed: false,
            compacted: false,
            message: format!("oplog_size_mb is already {desired_mb} mb"),
            outcome: Some(Outcome::AlreadySized),
        }
    }

    pub(crate) fn resized(message: String, compacted: bool, outcome: Outcome) -> Self {
        Self {
            changed: true,
            compacted,
            message,
            outcome: Some(outcome),
        }
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn compacted(&self) -> bool {
        self.compacted
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `None` only for results rebuilt from JSON.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// `{"changed":..,"compacted":..,"msg":..}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "changed": self.changed,
            "compacted": self.compacted,
            "msg": self.message,
        })
    }
}
