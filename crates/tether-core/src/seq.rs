//! Wraparound-safe sequence numbers.
//!
//! Serial-number arithmetic over the full u32 space: a counter that has
//! wrapped past the maximum still compares as at-or-after one sitting just
//! below the wrap point. The comparison is not a total order — antisymmetry
//! breaks for values exactly half the space apart — so this type deliberately
//! implements no `Ord` and exposes [`SequenceNumber::at_or_after`] instead.

use std::fmt;

use zerocopy::byteorder::{BigEndian, U32};

/// Half the sequence space. `a` counts as at-or-after `b` when the modular
/// distance from `b` to `a` is below this.
const HALF_SPACE: u32 = 1 << 31;

/// A modular counter stamped into every data frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    pub const ZERO: Self = Self(0);

    pub fn new(n: u32) -> Self {
        Self(n)
    }

    /// Serial comparison: true when `self` is at or after `other`, treating
    /// the space as circular.
    pub fn at_or_after(self, other: Self) -> bool {
        self.0.wrapping_sub(other.0) < HALF_SPACE
    }

    /// The successor, wrapping at the top of the space.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Return the current value and advance by one — the accessor used when
    /// stamping an outgoing frame.
    pub fn post_increment(&mut self) -> Self {
        let current = *self;
        *self = self.next();
        current
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<U32<BigEndian>> for SequenceNumber {
    fn from(raw: U32<BigEndian>) -> Self {
        Self(raw.get())
    }
}

impl From<SequenceNumber> for U32<BigEndian> {
    fn from(seq: SequenceNumber) -> Self {
        U32::new(seq.0)
    }
}
