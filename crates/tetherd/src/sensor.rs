//! Demo value source.
//!
//! Stands in for a live sensor: a counter that ticks forward on roughly 80%
//! of samples, encoded little-endian into the fixed payload slot.

use rand::rngs::StdRng;
use rand::Rng;

use tether_core::{Payload, PAYLOAD_SIZE};

/// Anything the source loop can poll once per iteration for the current
/// value. Implementations may change the value between calls.
pub trait Reading {
    fn sample(&mut self) -> Payload;
}

pub struct CounterReading {
    value: u64,
    rng: StdRng,
}

impl CounterReading {
    pub fn new(rng: StdRng) -> Self {
        Self { value: 0, rng }
    }
}

impl Reading for CounterReading {
    fn sample(&mut self) -> Payload {
        if self.rng.gen_bool(0.8) {
            self.value += 1;
            tracing::debug!(value = self.value, "counter advanced");
        }
        encode_value(self.value)
    }
}

/// Encode a counter value into the payload slot, zero padded.
pub fn encode_value(value: u64) -> Payload {
    let mut payload = [0u8; PAYLOAD_SIZE];
    payload[..8].copy_from_slice(&value.to_le_bytes());
    payload
}

/// Inverse of [`encode_value`], for log lines.
pub fn decode_value(payload: &Payload) -> u64 {
    u64::from_le_bytes(payload[..8].try_into().unwrap())
}
