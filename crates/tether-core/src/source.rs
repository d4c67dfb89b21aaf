//! Source role state machine.
//!
//! The Source produces the shared value and drives the rendezvous: it offers
//! a fresh identity to any peer it does not recognize, binds when the offer
//! is acknowledged, and from then on pushes the value whenever it changes or
//! the Mirror echoes something stale. The whole role is one [`Source::step`]
//! per received-frame-or-timeout with at most one reply frame; the daemon
//! loop owns the socket.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::link::Link;
use crate::seq::SequenceNumber;
use crate::timer::Countdown;
use crate::wire::{Frame, Payload, PeerId, CONTROL_FILLER, PAYLOAD_SIZE};

/// Countdown durations governing the Source loop.
#[derive(Debug, Clone)]
pub struct SourceTiming {
    /// How long an unanswered identity offer stays open.
    pub reply_window: Duration,
    /// Silence from the bound Mirror after which the link is declared dead.
    pub disconnect: Duration,
    /// Minimum interval between resends of an unchanged value.
    pub resend_cooldown: Duration,
}

impl Default for SourceTiming {
    fn default() -> Self {
        Self {
            reply_window: Duration::from_secs(10),
            disconnect: Duration::from_secs(16),
            resend_cooldown: Duration::from_millis(200),
        }
    }
}

/// Where the Source currently stands with its peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No peer bound, no offer outstanding.
    Discovering,
    /// A candidate identity has been offered and its reply window is open.
    Negotiating,
    /// Peer bound, traffic flowing.
    Connected,
}

pub struct Source {
    link: Link,
    rng: StdRng,
    /// Identity offered to a prospective peer; UNKNOWN when none outstanding.
    candidate: PeerId,
    connected: bool,
    /// Payload of the most recent push, for flood suppression.
    last_sent: Option<Payload>,
    reading: Payload,
    reply_window: Countdown,
    disconnect: Countdown,
    resend_cooldown: Countdown,
}

impl Source {
    pub fn new(mut rng: StdRng, timing: &SourceTiming, now: Instant) -> Self {
        let local_id = PeerId::generate(&mut rng, &[]);
        Self {
            link: Link::new(local_id),
            rng,
            candidate: PeerId::UNKNOWN,
            connected: false,
            last_sent: None,
            reading: [0; PAYLOAD_SIZE],
            reply_window: Countdown::new(timing.reply_window, false, now),
            disconnect: Countdown::new(timing.disconnect, false, now),
            resend_cooldown: Countdown::new(timing.resend_cooldown, true, now),
        }
    }

    pub fn local_id(&self) -> PeerId {
        self.link.local_id
    }

    pub fn peer_id(&self) -> PeerId {
        self.link.peer_id
    }

    pub fn phase(&self) -> Phase {
        if self.connected {
            Phase::Connected
        } else if !self.candidate.is_unknown() {
            Phase::Negotiating
        } else {
            Phase::Discovering
        }
    }

    /// The one unsolicited frame sent before the loop starts: announces our
    /// presence (receiver still unknown) and carries the first reading.
    pub fn startup_frame(&mut self, reading: Payload) -> Frame {
        self.reading = reading;
        self.link.stamp(reading)
    }

    /// One protocol iteration: poll the timers, classify `inbound` (or its
    /// absence) against the current state, and produce at most one reply.
    pub fn step(&mut self, inbound: Option<Frame>, reading: Payload, now: Instant) -> Option<Frame> {
        let previous = std::mem::replace(&mut self.reading, reading);

        if self.reply_window.just_expired(now) {
            tracing::info!(candidate = %self.candidate, "offer went unanswered, dropping candidate");
            self.candidate = PeerId::UNKNOWN;
        }
        if self.disconnect.just_expired(now) {
            tracing::info!(peer = %self.link.peer_id, "peer silent past disconnect timeout");
            self.connected = false;
            self.link.reset(PeerId::UNKNOWN);
            self.candidate = PeerId::UNKNOWN;
        }

        let Some(frame) = inbound else {
            if self.connected && previous != reading {
                tracing::debug!("reading changed, pushing update");
                self.last_sent = Some(reading);
                return Some(self.link.stamp(reading));
            }
            return None;
        };

        if !self.link.peer_id.is_unknown()
            && frame.sender() == self.link.peer_id
            && frame.receiver() == self.link.local_id
        {
            return self.on_peer_frame(&frame, now);
        }

        if !self.candidate.is_unknown()
            && frame.sender() == self.candidate
            && frame.receiver() == self.link.local_id
            && !frame.id_change().is_unknown()
        {
            return Some(self.on_offer_acknowledged(now));
        }

        Some(self.on_unrecognized(&frame, now))
    }

    /// Ordinary traffic from the bound peer: accept in serial order, and
    /// correct the peer when its echo disagrees with the current reading.
    fn on_peer_frame(&mut self, frame: &Frame, now: Instant) -> Option<Frame> {
        if !self.link.accepts(frame.sequence()) {
            tracing::debug!(seq = %frame.sequence(), "stale frame from peer, discarding");
            return None;
        }
        self.link.advance_rx(frame.sequence());
        self.disconnect.reset(now);

        if frame.payload() == self.reading {
            return None;
        }

        // The peer echoed an old value. Resend, unless that would repeat the
        // previous resend inside the cooldown window.
        if self.last_sent != Some(self.reading) || self.resend_cooldown.just_expired(now) {
            tracing::debug!("peer echoed stale value, resending current");
            self.resend_cooldown.reset(now);
            self.last_sent = Some(self.reading);
            Some(self.link.stamp(self.reading))
        } else {
            tracing::trace!("suppressing resend of unchanged value inside cooldown");
            None
        }
    }

    /// The candidate answered: bind it as the peer and start pushing.
    fn on_offer_acknowledged(&mut self, now: Instant) -> Frame {
        tracing::info!(peer = %self.candidate, "offer acknowledged, link established");
        self.link.reset(self.candidate);
        self.candidate = PeerId::UNKNOWN;
        self.reply_window.stop();
        self.connected = true;
        self.disconnect.reset(now);
        self.last_sent = None;
        self.link.stamp(self.reading)
    }

    /// Unrecognized sender/receiver pairing — e.g. a beacon from an unbound
    /// peer. Answer with an identity offer.
    fn on_unrecognized(&mut self, frame: &Frame, now: Instant) -> Frame {
        if self.candidate.is_unknown() {
            self.candidate = PeerId::generate(&mut self.rng, &[self.link.peer_id]);
            self.reply_window.reset(now);
            tracing::info!(candidate = %self.candidate, to = %frame.sender(), "offering new identity");
        }
        self.last_sent = None;
        Frame::new(
            self.link.local_id,
            frame.sender(),
            self.candidate,
            SequenceNumber::ZERO,
            CONTROL_FILLER,
        )
    }
}
