//! Collaborator boundary.
//!
//! The engine never talks to a server directly. A connected, authenticated
//! handle implements both traits (see `oplog-mongo`); tests use the
//! in-memory member from `oplog-testkit`.
//!
//! Every method blocks until the remote call returns. Deadlines, if any,
//! belong to the implementation's transport.

use crate::{AdminError, MemberRole};

/// Administrative operations on the member's oplog collection.
pub trait AdminClient {
    /// Configured maximum oplog size in megabytes (bytes / 1024²; may be fractional).
    fn oplog_size_mb(&self) -> Result<f64, AdminError>;

    /// Resize the oplog to `size_mb` megabytes.
    fn set_oplog_size_mb(&self, size_mb: u64) -> Result<(), AdminError>;

    /// Compact the oplog collection to reclaim disk space.
    fn compact_oplog(&self) -> Result<(), AdminError>;
}

/// Replication topology as seen from the connected member.
pub trait TopologyOracle {
    fn member_role(&self) -> Result<MemberRole, AdminError>;
}

impl<T: AdminClient + ?Sized> AdminClient for &T {
    fn oplog_size_mb(&self) -> Result<f64, AdminError> {
        (**self).oplog_size_mb()
    }

    fn set_oplog_size_mb(&self, size_mb: u64) -> Result<(), AdminError> {
        (**self).set_oplog_size_mb(size_mb)
    }

    fn compact_oplog(&self) -> Result<(), AdminError> {
        (**self).compact_oplog()
    }
}

impl<T: TopologyOracle + ?Sized> TopologyOracle for &T {
    fn member_role(&self) -> Result<MemberRole, AdminError> {
        (**self).member_role()
    }
}
