//! A second run with the same desired config against a member that kept the
//! first run's write is a no-op.

use oplog_reconcile::*;
use oplog_testkit::FakeMember;

#[test]
fn second_run_is_a_noop() {
    let member = FakeMember::new(16000, MemberRole::Secondary);
    let d = DesiredConfig::new(8000, true, false).unwrap();

    let first = reconcile(&member, &d).unwrap();
    assert!(first.changed());
    assert!(first.compacted());

    let second = reconcile(&member, &d).unwrap();
    assert!(!second.changed());
    assert!(!second.compacted());
    assert_eq!(second.message(), "oplog_size_mb is already 8000 mb");

    // Exactly one resize and one compact across both runs.
    assert_eq!(member.resize_log(), vec![8000]);
    assert_eq!(member.calls().compactions, 1);
    assert_eq!(member.calls().size_reads, 2);
}

#[test]
fn check_mode_does_not_converge() {
    let member = FakeMember::new(16000, MemberRole::Secondary);
    let d = DesiredConfig::new(8000, false, true).unwrap();

    assert!(reconcile(&member, &d).unwrap().changed());
    assert!(reconcile(&member, &d).unwrap().changed());
    assert_eq!(member.calls().writes(), 0);
}

#[test]
fn fractional_size_never_matches_exactly() {
    // 8000 mb plus half a megabyte: reported as 8000.5, rounded for display.
    let bytes = 8000.0 * BYTES_PER_MB + 524_288.0;
    let member = FakeMember::with_size_bytes(bytes, MemberRole::Secondary);
    let d = DesiredConfig::new(8000, true, false).unwrap();

    let r = reconcile(&member, &d).unwrap();
    assert!(r.changed());
    assert!(r.compacted(), "8000.5 > 8000 counts as shrinking");
    assert_eq!(r.message(), "oplog has been resized from 8000 mb to 8000 mb");

    assert!(!reconcile(&member, &d).unwrap().changed());
}
