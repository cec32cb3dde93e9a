//! Driver error -> [`AdminFailure`] mapping.

use mongodb::error::{Error as MongoError, ErrorKind};
use oplog_reconcile::{AdminError, AdminFailure};

/// Server error codes that mean "not allowed" rather than "broken".
const PERMISSION_CODES: &[i32] = &[
    13,    // Unauthorized
    20,    // IllegalOperation (e.g. compact on an active primary)
    10107, // NotWritablePrimary
    13435, // NotPrimaryNoSecondaryOk
];

/// Server error codes that mean the member could not be reached, or dropped
/// the conversation, or refused our identity.
const CONNECTIVITY_CODES: &[i32] = &[
    6,     // HostUnreachable
    7,     // HostNotFound
    18,    // AuthenticationFailed
    89,    // NetworkTimeout
    91,    // ShutdownInProgress
    9001,  // SocketException
    11600, // InterruptedAtShutdown
    11602, // InterruptedDueToReplStateChange
];

pub fn failure_for_code(code: i32) -> AdminFailure {
    if PERMISSION_CODES.contains(&code) {
        AdminFailure::Permission
    } else if CONNECTIVITY_CODES.contains(&code) {
        AdminFailure::Connectivity
    } else {
        AdminFailure::Rejected
    }
}

pub fn classify(err: &MongoError) -> AdminFailure {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => failure_for_code(cmd.code),
        ErrorKind::Authentication { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => AdminFailure::Connectivity,
        _ => AdminFailure::Rejected,
    }
}

/// Classified [`AdminError`] carrying the driver's message as the cause.
pub fn admin_error(err: &MongoError) -> AdminError {
    AdminError::new(classify(err), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_codes_are_permission() {
        assert_eq!(failure_for_code(13), AdminFailure::Permission);
        assert_eq!(failure_for_code(20), AdminFailure::Permission);
        assert_eq!(failure_for_code(10107), AdminFailure::Permission);
    }

    #[test]
    fn transport_and_auth_codes_are_connectivity() {
        assert_eq!(failure_for_code(18), AdminFailure::Connectivity);
        assert_eq!(failure_for_code(89), AdminFailure::Connectivity);
        assert_eq!(failure_for_code(9001), AdminFailure::Connectivity);
    }

    #[test]
    fn everything_else_is_rejected() {
        assert_eq!(failure_for_code(2), AdminFailure::Rejected); // BadValue
        assert_eq!(failure_for_code(59), AdminFailure::Rejected); // CommandNotFound
        assert_eq!(failure_for_code(76), AdminFailure::Rejected); // NoReplicationEnabled
    }
}
