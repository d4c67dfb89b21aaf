//! In-memory test harness.
//!
//! A [`Harness`] owns one Source and one Mirror joined by two frame queues —
//! the medium — and a synthetic clock. Each [`Harness::round`] lets every
//! side consume at most one queued frame and emit at most one reply, then
//! advances the clock by [`STEP`]. Tests model loss by clearing a queue and
//! duplication by pushing a frame twice.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use tether_core::{
    Frame, Mirror, MirrorTiming, Payload, PeerId, Phase, Source, SourceTiming, PAYLOAD_SIZE,
};

/// Wall-clock advance per scheduler round.
pub const STEP: Duration = Duration::from_millis(100);

/// The identity the mirror boots with, before any rendezvous.
pub const MIRROR_BOOT_ID: PeerId = PeerId(0x4d52_0001);

/// Encode a counter value into the payload slot, zero padded — the same
/// little-endian layout the daemon's demo sensor uses.
pub fn reading(n: u64) -> Payload {
    let mut payload = [0u8; PAYLOAD_SIZE];
    payload[..8].copy_from_slice(&n.to_le_bytes());
    payload
}

pub struct Harness {
    pub now: Instant,
    pub source: Source,
    pub mirror: Mirror,
    /// Frames in flight toward the mirror.
    pub to_mirror: VecDeque<Frame>,
    /// Frames in flight toward the source.
    pub to_source: VecDeque<Frame>,
    /// Copy of the most recent frame the source put on the medium.
    pub last_from_source: Option<Frame>,
}

impl Harness {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            now,
            source: Source::new(StdRng::seed_from_u64(1), &SourceTiming::default(), now),
            mirror: Mirror::new(MIRROR_BOOT_ID, &MirrorTiming::default(), now),
            to_mirror: VecDeque::new(),
            to_source: VecDeque::new(),
            last_from_source: None,
        }
    }

    /// Both processes start up: each puts its announcement on the medium.
    pub fn boot(&mut self, value: Payload) {
        let frame = self.source.startup_frame(value);
        self.last_from_source = Some(frame.clone());
        self.to_mirror.push_back(frame);
        self.to_source.push_back(self.mirror.startup_frame());
    }

    /// One scheduler round. Returns whether (source, mirror) each sent.
    pub fn round(&mut self, value: Payload) -> (bool, bool) {
        let inbound = self.to_source.pop_front();
        let source_sent = match self.source.step(inbound, value, self.now) {
            Some(frame) => {
                self.last_from_source = Some(frame.clone());
                self.to_mirror.push_back(frame);
                true
            }
            None => false,
        };

        let inbound = self.to_mirror.pop_front();
        let mirror_sent = match self.mirror.step(inbound, self.now) {
            Some(frame) => {
                self.to_source.push_back(frame);
                true
            }
            None => false,
        };

        self.now += STEP;
        (source_sent, mirror_sent)
    }

    /// Drive rounds until both ends are bound to each other.
    pub fn run_until_connected(&mut self, value: Payload, max_rounds: usize) -> bool {
        for _ in 0..max_rounds {
            if self.is_connected() {
                return true;
            }
            self.round(value);
        }
        self.is_connected()
    }

    /// Drive rounds until the mirror holds `value`.
    pub fn run_until_synced(&mut self, value: Payload, max_rounds: usize) -> bool {
        for _ in 0..max_rounds {
            if self.mirror.value() == value {
                return true;
            }
            self.round(value);
        }
        self.mirror.value() == value
    }

    pub fn is_connected(&self) -> bool {
        self.source.phase() == Phase::Connected
            && self.source.peer_id() == self.mirror.local_id()
            && self.mirror.peer_id() == self.source.local_id()
    }

    /// Swap in a freshly started source process (new identity, empty state),
    /// leaving the mirror and anything in flight untouched.
    pub fn replace_source(&mut self, seed: u64, value: Payload) {
        self.source = Source::new(StdRng::seed_from_u64(seed), &SourceTiming::default(), self.now);
        let frame = self.source.startup_frame(value);
        self.last_from_source = Some(frame.clone());
        self.to_mirror.push_back(frame);
    }
}
