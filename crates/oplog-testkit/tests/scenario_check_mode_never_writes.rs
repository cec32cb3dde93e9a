//! Check-only runs: `changed=true` when sizes differ, zero writes, and
//! `compacted` = (role == SECONDARY && compact) regardless of direction.

use oplog_reconcile::*;
use oplog_testkit::FakeMember;

#[test]
fn check_mode_matrix() {
    let roles = [MemberRole::Primary, MemberRole::Secondary, MemberRole::Other];
    let sizes = [(16000u64, 8000i64), (8000, 16000)];

    for role in roles {
        for compact in [false, true] {
            for (current, wanted) in sizes {
                let member = FakeMember::new(current, role);
                let d = DesiredConfig::new(wanted, compact, true).unwrap();
                let r = reconcile(&member, &d).unwrap();

                let ctx = format!("role={role} compact={compact} {current}->{wanted}");
                assert!(r.changed(), "{ctx}");
                assert_eq!(r.compacted(), role == MemberRole::Secondary && compact, "{ctx}");
                assert_eq!(member.calls().writes(), 0, "{ctx}");
                assert_eq!(member.calls().role_reads, 1, "{ctx}");
            }
        }
    }
}

#[test]
fn check_mode_noop_still_reports_unchanged() {
    let member = FakeMember::new(990, MemberRole::Secondary);
    let r = reconcile(&member, &DesiredConfig::new(990, true, true).unwrap()).unwrap();
    assert!(!r.changed());
    assert!(!r.compacted());
    assert_eq!(member.calls().writes(), 0);
}
