//! Mirror role state machine.
//!
//! The Mirror never initiates discovery under an identity of its own
//! choosing: it beacons its current value into the void, adopts whatever
//! identity a Source offers it, and echoes every value it accepts — the echo
//! doubles as the Source's liveness signal.

use std::time::{Duration, Instant};

use crate::link::Link;
use crate::seq::SequenceNumber;
use crate::timer::Countdown;
use crate::wire::{Frame, Payload, PeerId, CONTROL_FILLER, PAYLOAD_SIZE};

/// Countdown durations governing the Mirror loop.
#[derive(Debug, Clone)]
pub struct MirrorTiming {
    /// Interval between unsolicited beacons while the medium is quiet.
    pub beacon: Duration,
}

impl Default for MirrorTiming {
    fn default() -> Self {
        Self {
            beacon: Duration::from_secs(1),
        }
    }
}

pub struct Mirror {
    link: Link,
    value: Payload,
    beacon: Countdown,
}

impl Mirror {
    /// A fresh mirror holding the all-zero value.
    pub fn new(local_id: PeerId, timing: &MirrorTiming, now: Instant) -> Self {
        Self {
            link: Link::new(local_id),
            value: [0; PAYLOAD_SIZE],
            beacon: Countdown::new(timing.beacon, true, now),
        }
    }

    pub fn local_id(&self) -> PeerId {
        self.link.local_id
    }

    pub fn peer_id(&self) -> PeerId {
        self.link.peer_id
    }

    /// The value this mirror currently holds.
    pub fn value(&self) -> Payload {
        self.value
    }

    /// The one unsolicited frame sent before the loop starts.
    pub fn startup_frame(&mut self) -> Frame {
        self.link.stamp(self.value)
    }

    /// One protocol iteration: classify `inbound` (or its absence) and
    /// produce at most one reply frame.
    pub fn step(&mut self, inbound: Option<Frame>, now: Instant) -> Option<Frame> {
        let Some(frame) = inbound else {
            if self.beacon.just_expired(now) {
                self.beacon.reset(now);
                tracing::debug!("medium quiet, beaconing current value");
                return Some(self.link.stamp(self.value));
            }
            return None;
        };

        if !self.link.peer_id.is_unknown()
            && frame.sender() == self.link.peer_id
            && frame.receiver() == self.link.local_id
            && frame.id_change().is_unknown()
        {
            return self.on_data(&frame, now);
        }

        if frame.receiver() == self.link.local_id && !frame.id_change().is_unknown() {
            return Some(self.on_offer(&frame));
        }

        tracing::debug!(sender = %frame.sender(), "unrecognized pairing, replying with presence");
        Some(self.link.stamp(self.value))
    }

    /// Ordinary data from the bound peer: accept in serial order, adopt a
    /// differing payload, and always echo — the echo is the ack the Source
    /// waits on.
    fn on_data(&mut self, frame: &Frame, now: Instant) -> Option<Frame> {
        if !self.link.accepts(frame.sequence()) {
            tracing::debug!(seq = %frame.sequence(), "stale frame, discarding");
            return None;
        }
        self.link.advance_rx(frame.sequence());

        if frame.payload() != self.value {
            self.value = frame.payload();
            tracing::info!(value = ?self.value, "adopted new value");
        }
        self.beacon.reset(now);
        Some(self.link.stamp(self.value))
    }

    /// An identity offer addressed to us: take the offered identity, bind the
    /// offering peer, and acknowledge with our old identity so the peer can
    /// correlate the reply to its offer.
    fn on_offer(&mut self, frame: &Frame) -> Frame {
        let old_id = self.link.local_id;
        self.link.rebind(frame.id_change(), frame.sender());
        tracing::info!(
            old = %old_id,
            new = %self.link.local_id,
            peer = %self.link.peer_id,
            "adopting offered identity"
        );
        Frame::new(
            self.link.local_id,
            self.link.peer_id,
            old_id,
            SequenceNumber::ZERO,
            CONTROL_FILLER,
        )
    }
}
