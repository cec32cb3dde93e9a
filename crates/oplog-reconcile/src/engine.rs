use tracing::{debug, info, warn};

use crate::{
    AdminClient, DesiredConfig, MemberRole, ObservedState, Outcome, ReconcileError,
    ReconciliationResult, TopologyOracle,
};

/// Compaction guard: SECONDARY only, only when requested, only when shrinking.
///
/// Any role other than SECONDARY (PRIMARY, ARBITER, ...) never compacts.
pub fn should_compact(role: MemberRole, compact: bool, current_mb: f64, desired_mb: f64) -> bool {
    role.is_secondary() && compact && current_mb > desired_mb
}

/// "oplog has been resized from <old> mb to <new> mb", both rounded to whole
/// megabytes (ties to even).
pub fn format_resize_message(current_mb: f64, desired_mb: u64) -> String {
    format!(
        "oplog has been resized from {} mb to {} mb",
        current_mb.round_ties_even(),
        desired_mb
    )
}

/// Drive one member toward `desired`.
///
/// Remote calls are issued strictly in order: read size, read role, resize,
/// compact. Each failure ends the run immediately with exactly one
/// [`ReconcileError`]; there is no retry and no partial result.
///
/// Size comparison is exact: a member reporting 7999.999 mb for a desired
/// 8000 mb is resized.
pub fn reconcile<C>(client: &C, desired: &DesiredConfig) -> Result<ReconciliationResult, ReconcileError>
where
    C: AdminClient + TopologyOracle + ?Sized,
{
    desired.validate()?;

    // READ_CURRENT
    let current_mb = client.oplog_size_mb().map_err(|e| {
        warn!(cause = %e, "oplog size read failed");
        ReconcileError::state_read(format!("Unable to get current oplog size: {e}"))
    })?;
    let desired_mb = desired.oplog_size_mb_f64();
    debug!(current_mb, desired_mb, "read current oplog size");

    // NOOP
    if current_mb == desired_mb {
        info!(size_mb = desired.oplog_size_mb, "oplog already at desired size");
        return Ok(ReconciliationResult::already_sized(desired.oplog_size_mb));
    }

    // READ_ROLE
    let role = client.member_role().map_err(|e| {
        warn!(cause = %e, "member role read failed");
        ReconcileError::state_read(format!("Unable to get member state: {e}"))
    })?;
    let observed = ObservedState {
        current_oplog_size_mb: current_mb,
        member_role: role,
    };
    debug!(?observed, "observed member state");

    let message = format_resize_message(current_mb, desired.oplog_size_mb);

    // SIMULATE
    if desired.check_only {
        let compacted = role.is_secondary() && desired.compact;
        info!(%role, compacted, "check mode: {message}");
        return Ok(ReconciliationResult::resized(message, compacted, Outcome::Simulated));
    }

    // RESIZE
    client
        .set_oplog_size_mb(desired.oplog_size_mb)
        .map_err(|e| {
            warn!(cause = %e, failure = ?e.failure, "resize failed; compact not attempted");
            ReconcileError::from_write("Unable to set oplog size", &e)
        })?;
    info!(%role, "{message}");

    if !should_compact(
        observed.member_role,
        desired.compact,
        observed.current_oplog_size_mb,
        desired_mb,
    ) {
        return Ok(ReconciliationResult::resized(message, false, Outcome::Resized));
    }

    // COMPACT
    client.compact_oplog().map_err(|e| {
        warn!(cause = %e, failure = ?e.failure, "oplog compaction failed after resize");
        ReconcileError::from_write("Error compacting member oplog", &e)
    })?;
    info!(%role, "member oplog compacted");

    Ok(ReconciliationResult::resized(
        message,
        true,
        Outcome::ResizedAndCompacted,
    ))
}
