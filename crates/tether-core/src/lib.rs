//! tether-core — wire format, sequence arithmetic, and the two role state
//! machines of the tether latest-value synchronization protocol.
//!
//! Everything in this crate is pure state: the daemon crate owns the sockets
//! and the clock, and drives each role one `step` at a time.

pub mod config;
pub mod link;
pub mod mirror;
pub mod seq;
pub mod source;
pub mod timer;
pub mod wire;

pub use link::Link;
pub use mirror::{Mirror, MirrorTiming};
pub use seq::SequenceNumber;
pub use source::{Phase, Source, SourceTiming};
pub use timer::Countdown;
pub use wire::{Frame, Payload, PeerId, CONTROL_FILLER, FRAME_LEN, PAYLOAD_SIZE};
