//! oplog-mongo
//!
//! MongoDB-backed [`AdminClient`](oplog_reconcile::AdminClient) and
//! [`TopologyOracle`](oplog_reconcile::TopologyOracle).
//!
//! One blocking driver handle per run, pinned to the configured member
//! (`directConnection=true`) so size, role, resize and compact all target the
//! same node.
//!
//! Server commands:
//! - size:    `local`  `{collStats: "oplog.rs"}` -> `maxSize` bytes
//! - resize:  `admin`  `{replSetResizeOplog: 1, size: <mb>}`
//! - compact: `local`  `{compact: "oplog.rs"}`
//! - role:    `admin`  `{replSetGetStatus: 1}` -> `myState`

mod classify;
mod client;

pub use classify::{admin_error, classify, failure_for_code};
pub use client::{client_options, connect, MongoAdminClient, APP_NAME};
