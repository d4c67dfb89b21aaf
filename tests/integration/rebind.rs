use crate::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tether_core::{Source, SourceTiming};

/// A restarted source process (fresh identity) takes the mirror over from
/// its previous binding.
#[test]
fn restarted_source_rebinds_the_mirror() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));
    assert!(h.run_until_synced(reading(2), 10));

    // The source process dies and comes back with a new identity.
    h.replace_source(7, reading(2));

    assert!(
        h.run_until_connected(reading(2), 100),
        "mirror never rebound to the restarted source"
    );
    assert!(h.run_until_synced(reading(9), 20));
}

/// The mirror's reply to an unrecognized announcement is addressed with its
/// existing peer id — a presence response, not a direct answer — and that
/// mis-addressed reply is exactly what provokes the new source's offer.
#[test]
fn presence_reply_keeps_the_old_peer_address_yet_still_rendezvouses() {
    let mut h = Harness::new();
    h.boot(reading(0));
    assert!(h.run_until_connected(reading(0), 50));
    let old_source_id = h.source.local_id();

    let mut fresh = Source::new(StdRng::seed_from_u64(7), &SourceTiming::default(), h.now);
    let announce = fresh.startup_frame(reading(0));

    let reply = h
        .mirror
        .step(Some(announce), h.now)
        .expect("unrecognized announcement draws a presence reply");
    assert_eq!(reply.receiver(), old_source_id);

    // The stale addressing is harmless: at the new source this is just an
    // unrecognized pairing, which starts the rendezvous.
    let offer = fresh
        .step(Some(reply), reading(0), h.now)
        .expect("presence reply provokes an offer");
    assert!(!offer.id_change().is_unknown());
    assert_eq!(offer.receiver(), h.mirror.local_id());
}
