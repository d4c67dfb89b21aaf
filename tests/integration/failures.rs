use crate::*;
use tether_core::Phase;

/// A lost push is repaired by the mirror's stale beacon provoking a resend.
#[test]
fn lost_push_is_repaired_by_the_next_stale_echo() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));
    assert!(h.run_until_synced(reading(0), 10));

    // The push carrying the new value is dropped by the medium.
    h.round(reading(7));
    h.to_mirror.clear();
    assert_ne!(h.mirror.value(), reading(7));

    // The mirror's periodic beacon echoes the stale value, which the source
    // answers with a correction.
    assert!(
        h.run_until_synced(reading(7), 30),
        "stale beacon should provoke a resend"
    );
}

/// Replaying an already-accepted frame is inert: no counter movement, no
/// echo, no value change.
#[test]
fn duplicated_frame_is_ignored_by_the_mirror() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));
    assert!(h.run_until_synced(reading(3), 10));
    for _ in 0..5 {
        h.round(reading(3));
    }
    h.to_source.clear();
    h.to_mirror.clear();

    // The medium regurgitates the last frame the source sent.
    let replay = h.last_from_source.clone().unwrap();
    let out = h.mirror.step(Some(replay), h.now);

    assert!(out.is_none(), "a duplicate must not be echoed");
    assert_eq!(h.mirror.value(), reading(3));
}

/// Total silence from the mirror eventually tears the link down, and the
/// next beacon after the medium heals builds it back up.
#[test]
fn severed_return_path_disconnects_then_recovers() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));

    // Nothing from the mirror reaches the source for well past the 16 s
    // disconnect timeout (rounds advance the clock 100 ms at a time).
    for _ in 0..200 {
        h.to_source.clear();
        h.round(reading(0));
    }

    assert_eq!(h.source.phase(), Phase::Discovering);
    assert!(h.source.peer_id().is_unknown());

    // Medium restored: beacons provoke a fresh rendezvous.
    assert!(
        h.run_until_connected(reading(0), 100),
        "link should re-establish after the outage"
    );
}
