use crate::*;

/// The end-to-end scenario: both ends start at 0, the source's value moves
/// to 5, the mirror converges within a round trip, and the matching echo
/// silences the source.
#[test]
fn value_propagates_and_resends_stop() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));
    assert!(h.run_until_synced(reading(0), 10));

    // The value moves to 5.
    assert!(h.run_until_synced(reading(5), 6), "mirror never adopted 5");

    // Let the echo land and the medium settle.
    for _ in 0..5 {
        h.round(reading(5));
    }

    // Steady state: the mirror may beacon, the source stays silent.
    let mut source_sends = 0;
    for _ in 0..40 {
        let (source_sent, _) = h.round(reading(5));
        if source_sent {
            source_sends += 1;
        }
    }
    assert_eq!(source_sends, 0, "matching echoes must not provoke resends");
    assert_eq!(h.mirror.value(), reading(5));
}

/// Successive changes each propagate; only the latest matters.
#[test]
fn mirror_tracks_a_moving_value() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));

    for n in 1..=10u64 {
        assert!(h.run_until_synced(reading(n), 10), "lost track at {n}");
    }
    assert_eq!(h.mirror.value(), reading(10));
}

/// A quiet connected link stays quiet apart from beacons: no traffic is
/// generated when nothing changes.
#[test]
fn unchanged_value_generates_no_source_traffic() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));
    for _ in 0..5 {
        h.round(reading(0));
    }

    let mut source_sends = 0;
    for _ in 0..50 {
        let (source_sent, _) = h.round(reading(0));
        if source_sent {
            source_sends += 1;
        }
    }
    assert_eq!(source_sends, 0);
}
