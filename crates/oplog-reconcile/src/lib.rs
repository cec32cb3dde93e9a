//! oplog-reconcile
//!
//! Idempotent oplog resize/compact reconciliation for one replica-set member.
//!
//! Decisions:
//! - Current size equal to desired size => no-op, no remote writes
//! - Check-only runs report the simulated outcome and never mutate
//! - Resize failure => compact is never attempted
//! - Compact only on a SECONDARY, only when requested, only when shrinking
//!
//! No IO of its own. Remote state is read and written exclusively through the
//! [`AdminClient`] and [`TopologyOracle`] collaborators.

mod client;
mod engine;
mod error;
mod types;

pub use client::{AdminClient, TopologyOracle};
pub use engine::{format_resize_message, reconcile, should_compact};
pub use error::*;
pub use types::*;
