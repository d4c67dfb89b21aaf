//! Per-link connection state.
//!
//! A [`Link`] is owned exclusively by one role loop: the process identity,
//! the bound peer identity, and the next sequence number in each direction.
//! No I/O happens here — stamping only fixes the header fields and advances
//! the outbound counter; whether the datagram later reaches the wire is not
//! this layer's concern.

use crate::seq::SequenceNumber;
use crate::wire::{Frame, Payload, PeerId};

#[derive(Debug, Clone)]
pub struct Link {
    pub local_id: PeerId,
    pub peer_id: PeerId,
    next_tx_seq: SequenceNumber,
    next_rx_seq: SequenceNumber,
}

impl Link {
    /// A fresh, unbound link. Both counters start at zero.
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            peer_id: PeerId::UNKNOWN,
            next_tx_seq: SequenceNumber::ZERO,
            next_rx_seq: SequenceNumber::ZERO,
        }
    }

    /// Build an ordinary data frame for the current peer. Advances the
    /// outbound counter unconditionally, even if the caller's send fails.
    pub fn stamp(&mut self, payload: Payload) -> Frame {
        Frame::new(
            self.local_id,
            self.peer_id,
            PeerId::UNKNOWN,
            self.next_tx_seq.post_increment(),
            payload,
        )
    }

    /// Serial-order acceptance test for an inbound sequence number.
    pub fn accepts(&self, sequence: SequenceNumber) -> bool {
        sequence.at_or_after(self.next_rx_seq)
    }

    /// Record an accepted inbound frame: expect its successor next.
    pub fn advance_rx(&mut self, sequence: SequenceNumber) {
        self.next_rx_seq = sequence.next();
    }

    /// Rebind to `peer` (or back to unbound) and zero both counters. The
    /// local identity is untouched.
    pub fn reset(&mut self, peer: PeerId) {
        self.peer_id = peer;
        self.next_tx_seq = SequenceNumber::ZERO;
        self.next_rx_seq = SequenceNumber::ZERO;
    }

    /// Adopt a new local identity and rebind in one step — the Mirror side
    /// of the rendezvous.
    pub fn rebind(&mut self, local: PeerId, peer: PeerId) {
        self.local_id = local;
        self.reset(peer);
    }

    pub fn next_tx_seq(&self) -> SequenceNumber {
        self.next_tx_seq
    }

    pub fn next_rx_seq(&self) -> SequenceNumber {
        self.next_rx_seq
    }
}
