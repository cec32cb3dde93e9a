//! In-memory replica-set member for reconciliation scenarios.
//!
//! [`FakeMember`] implements both collaborator traits, applies resizes to its
//! own state (so a second run sees the new size), counts every call, and can
//! be told to fail any single operation. No network I/O.

use oplog_reconcile::{AdminClient, AdminError, MemberRole, TopologyOracle, BYTES_PER_MB};
use std::cell::{Cell, RefCell};

/// Per-operation call counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub size_reads: usize,
    pub role_reads: usize,
    pub resizes: usize,
    pub compactions: usize,
}

impl CallCounts {
    /// Calls that mutate the member.
    pub fn writes(&self) -> usize {
        self.resizes + self.compactions
    }
}

/// Sticky fault per operation: once set, every call fails.
#[derive(Clone, Debug, Default)]
struct Faults {
    read_size: Option<AdminError>,
    read_role: Option<AdminError>,
    resize: Option<AdminError>,
    compact: Option<AdminError>,
}

/// Deterministic stand-in for a connected replica-set member.
pub struct FakeMember {
    max_size_bytes: Cell<f64>,
    role: MemberRole,
    faults: RefCell<Faults>,
    counts: Cell<CallCounts>,
    resize_log: RefCell<Vec<u64>>,
}

impl FakeMember {
    pub fn new(size_mb: u64, role: MemberRole) -> Self {
        Self::with_size_bytes(size_mb as f64 * BYTES_PER_MB, role)
    }

    /// Member whose configured size is an arbitrary byte count, e.g. one that
    /// does not divide evenly into megabytes.
    pub fn with_size_bytes(bytes: f64, role: MemberRole) -> Self {
        Self {
            max_size_bytes: Cell::new(bytes),
            role,
            faults: RefCell::new(Faults::default()),
            counts: Cell::new(CallCounts::default()),
            resize_log: RefCell::new(Vec::new()),
        }
    }

    pub fn fail_size_read(self, err: AdminError) -> Self {
        self.faults.borrow_mut().read_size = Some(err);
        self
    }

    pub fn fail_role_read(self, err: AdminError) -> Self {
        self.faults.borrow_mut().read_role = Some(err);
        self
    }

    pub fn fail_resize(self, err: AdminError) -> Self {
        self.faults.borrow_mut().resize = Some(err);
        self
    }

    pub fn fail_compact(self, err: AdminError) -> Self {
        self.faults.borrow_mut().compact = Some(err);
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.counts.get()
    }

    /// Sizes passed to every successful resize, in order.
    pub fn resize_log(&self) -> Vec<u64> {
        self.resize_log.borrow().clone()
    }

    pub fn current_size_mb(&self) -> f64 {
        self.max_size_bytes.get() / BYTES_PER_MB
    }

    fn bump(&self, f: impl FnOnce(&mut CallCounts)) {
        let mut c = self.counts.get();
        f(&mut c);
        self.counts.set(c);
    }
}

impl AdminClient for FakeMember {
    fn oplog_size_mb(&self) -> Result<f64, AdminError> {
        self.bump(|c| c.size_reads += 1);
        if let Some(e) = &self.faults.borrow().read_size {
            return Err(e.clone());
        }
        Ok(self.current_size_mb())
    }

    fn set_oplog_size_mb(&self, size_mb: u64) -> Result<(), AdminError> {
        self.bump(|c| c.resizes += 1);
        if let Some(e) = &self.faults.borrow().resize {
            return Err(e.clone());
        }
        self.max_size_bytes.set(size_mb as f64 * BYTES_PER_MB);
        self.resize_log.borrow_mut().push(size_mb);
        Ok(())
    }

    fn compact_oplog(&self) -> Result<(), AdminError> {
        self.bump(|c| c.compactions += 1);
        if let Some(e) = &self.faults.borrow().compact {
            return Err(e.clone());
        }
        // The server refuses to compact on an active primary.
        if self.role == MemberRole::Primary {
            return Err(AdminError::permission(
                "will not run compact on an active replica set primary",
            ));
        }
        Ok(())
    }
}

impl TopologyOracle for FakeMember {
    fn member_role(&self) -> Result<MemberRole, AdminError> {
        self.bump(|c| c.role_reads += 1);
        if let Some(e) = &self.faults.borrow().read_role {
            return Err(e.clone());
        }
        Ok(self.role)
    }
}
