use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Collaborator-level failures
// ---------------------------------------------------------------------------

/// Classification a collaborator attaches to a failed remote call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminFailure {
    /// Member unreachable, transport broken, or authentication rejected.
    Connectivity,
    /// Authenticated, but the operation is not allowed for this user or role.
    Permission,
    /// Any other server-side rejection (bad value, unsupported command, ...).
    Rejected,
}

/// Error returned by [`crate::AdminClient`] / [`crate::TopologyOracle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminError {
    pub failure: AdminFailure,
    /// Human-readable cause, already free of credentials.
    pub cause: String,
}

impl AdminError {
    pub fn new(failure: AdminFailure, cause: impl Into<String>) -> Self {
        Self {
            failure,
            cause: cause.into(),
        }
    }

    pub fn connectivity(cause: impl Into<String>) -> Self {
        Self::new(AdminFailure::Connectivity, cause)
    }

    pub fn permission(cause: impl Into<String>) -> Self {
        Self::new(AdminFailure::Permission, cause)
    }

    pub fn rejected(cause: impl Into<String>) -> Self {
        Self::new(AdminFailure::Rejected, cause)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cause)
    }
}

impl std::error::Error for AdminError {}

// ---------------------------------------------------------------------------
// Run-level failures
// ---------------------------------------------------------------------------

/// Failure kinds surfaced to the caller of a reconciliation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FailureKind {
    /// Cannot reach or authenticate to the member.
    Connectivity,
    /// Authenticated but lacking privilege for the attempted operation.
    Permission,
    /// Current size or member role could not be determined.
    StateRead,
    /// Malformed input; nothing was sent to the member.
    Validation,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Connectivity => "ConnectivityError",
            FailureKind::Permission => "PermissionError",
            FailureKind::StateRead => "StateReadError",
            FailureKind::Validation => "ValidationError",
        }
    }

    /// Kind used when a write (resize/compact) fails with `failure`.
    ///
    /// A member that refuses a write is a permission-class failure whatever
    /// the server's reason; only a broken link is reported as connectivity.
    pub fn for_write(failure: AdminFailure) -> Self {
        match failure {
            AdminFailure::Connectivity => FailureKind::Connectivity,
            AdminFailure::Permission | AdminFailure::Rejected => FailureKind::Permission,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of a run. No partial result accompanies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileError {
    pub kind: FailureKind,
    pub message: String,
}

impl ReconcileError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Connectivity, message)
    }

    pub fn state_read(message: impl Into<String>) -> Self {
        Self::new(FailureKind::StateRead, message)
    }

    /// Wrap a failed write with `context`, classifying by the cause.
    pub fn from_write(context: &str, err: &AdminError) -> Self {
        Self::new(
            FailureKind::for_write(err.failure),
            format!("{context}: {}", err.cause),
        )
    }

    /// `{"failed":true,"kind":..,"msg":..}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failed": true,
            "kind": self.kind.as_str(),
            "msg": self.message,
        })
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ReconcileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failures_keep_their_class() {
        let perm = ReconcileError::from_write(
            "Unable to set oplog size",
            &AdminError::permission("not authorized on admin"),
        );
        assert_eq!(perm.kind, FailureKind::Permission);
        assert_eq!(perm.message, "Unable to set oplog size: not authorized on admin");

        let net = ReconcileError::from_write("x", &AdminError::connectivity("socket closed"));
        assert_eq!(net.kind, FailureKind::Connectivity);

        let bad = ReconcileError::from_write("x", &AdminError::rejected("BadValue"));
        assert_eq!(bad.kind, FailureKind::Permission);
        assert_eq!(bad.to_json()["kind"], "PermissionError");
    }

    #[test]
    fn failure_json_shape() {
        let e = ReconcileError::state_read("Unable to get member state: boom");
        let v = e.to_json();
        assert_eq!(v["failed"], true);
        assert_eq!(v["kind"], "StateReadError");
        assert_eq!(v["msg"], "Unable to get member state: boom");
    }
}
