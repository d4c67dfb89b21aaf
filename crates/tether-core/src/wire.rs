//! Tether wire format — the single datagram type both roles exchange.
//!
//! Every datagram on the medium is one [`Frame`]: three peer identities, one
//! sequence number, one payload slot. 25 bytes, big-endian, no checksum and
//! no length prefix — integrity belongs to the layer below, and a buffer is
//! only decodable at exactly [`FRAME_LEN`] bytes. Any 25-byte pattern parses;
//! whether it makes sense is the role state machines' decision, not the
//! codec's.

use std::fmt;

use rand::Rng;
use static_assertions::assert_eq_size;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::seq::SequenceNumber;

/// Bytes per identity field on the wire.
pub const ID_SIZE: usize = 4;

/// Bytes per sequence number on the wire.
pub const SEQUENCE_NUMBER_SIZE: usize = 4;

/// Bytes of synchronized value carried by every frame.
pub const PAYLOAD_SIZE: usize = 9;

/// Total frame size. Any datagram of a different length fails to decode.
pub const FRAME_LEN: usize = 3 * ID_SIZE + SEQUENCE_NUMBER_SIZE + PAYLOAD_SIZE;

/// The synchronized value: one opaque fixed-size byte block.
pub type Payload = [u8; PAYLOAD_SIZE];

/// Filler payload carried by rendezvous control frames, which have no value
/// to transport.
pub const CONTROL_FILLER: Payload = [0xff; PAYLOAD_SIZE];

// ── Identity ─────────────────────────────────────────────────────────────────

/// Fixed-width peer-distinguishing number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerId(pub u32);

impl PeerId {
    /// Sentinel meaning "no identity" / "no change requested". Never produced
    /// by [`PeerId::generate`].
    pub const UNKNOWN: Self = Self(0);

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    /// Draw a fresh identity from `rng`, excluding the sentinel and every id
    /// in `excluding`.
    pub fn generate(rng: &mut impl Rng, excluding: &[PeerId]) -> Self {
        loop {
            let id = Self(rng.gen());
            if !id.is_unknown() && !excluding.contains(&id) {
                return id;
            }
        }
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

// ── Frame ────────────────────────────────────────────────────────────────────

/// The on-wire datagram.
///
/// Wire size: 25 bytes, all integers big-endian.
///
/// ```text
/// sender(4) | receiver(4) | id_change(4) | sequence(4) | payload(9)
/// ```
///
/// `id_change` is [`PeerId::UNKNOWN`] on every frame except the two
/// rendezvous control frames (the identity offer and its acknowledgment).
#[derive(Debug, Clone, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
#[repr(C, packed)]
pub struct Frame {
    sender: U32<BigEndian>,
    receiver: U32<BigEndian>,
    id_change: U32<BigEndian>,
    sequence: U32<BigEndian>,
    payload: [u8; PAYLOAD_SIZE],
}

// Compile-time size guard. If this fails, the wire format has silently changed.
assert_eq_size!(Frame, [u8; FRAME_LEN]);

impl Frame {
    pub fn new(
        sender: PeerId,
        receiver: PeerId,
        id_change: PeerId,
        sequence: SequenceNumber,
        payload: Payload,
    ) -> Self {
        Self {
            sender: U32::new(sender.0),
            receiver: U32::new(receiver.0),
            id_change: U32::new(id_change.0),
            sequence: sequence.into(),
            payload,
        }
    }

    /// Decode an exact-length buffer. Any other length is a decode failure —
    /// the codec never truncates or pads.
    pub fn parse(buf: &[u8]) -> Result<Self, WireError> {
        Self::read_from(buf).ok_or(WireError::BadLength(buf.len()))
    }

    pub fn sender(&self) -> PeerId {
        PeerId(self.sender.get())
    }

    pub fn receiver(&self) -> PeerId {
        PeerId(self.receiver.get())
    }

    pub fn id_change(&self) -> PeerId {
        PeerId(self.id_change.get())
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence.into()
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Errors that can arise when interpreting wire-format data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("datagram length {0} is not the frame size {}", FRAME_LEN)]
    BadLength(usize),
}

// ── Tests ────────────────────────────────────────────────────────────────────
