//! Sticky edge-event latch shared between interrupt and main context.
//!
//! One bit per input interrupt line. Interrupt dispatch merges fired bits
//! in; the wait engine clears a port's bit before arming a wait and then
//! polls it. All operations are lock-free single atomics, safe from any
//! context.

use core::sync::atomic::{AtomicU32, Ordering};

/// A process-wide set of sticky edge-event bits.
pub struct EdgeLatch(AtomicU32);

impl EdgeLatch {
    /// Creates an empty latch. Const-constructable for statics.
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Merges `bits` into the latch (interrupt context).
    pub fn merge(&self, bits: u32) {
        self.0.fetch_or(bits, Ordering::AcqRel);
    }

    /// Clears `bits` from the latch.
    pub fn clear(&self, bits: u32) {
        self.0.fetch_and(!bits, Ordering::AcqRel);
    }

    /// Whether any of `bits` is latched.
    pub fn contains(&self, bits: u32) -> bool {
        self.0.load(Ordering::Acquire) & bits != 0
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_sticky() {
        let latch = EdgeLatch::new();
        latch.merge(1 << 13);
        latch.merge(1 << 14);
        assert!(latch.contains(1 << 13));
        assert!(latch.contains(1 << 14));
    }

    #[test]
    fn clear_only_clears_requested_bits() {
        let latch = EdgeLatch::new();
        latch.merge(0b110);
        latch.clear(0b010);
        assert!(!latch.contains(0b010));
        assert!(latch.contains(0b100));
    }

    #[test]
    fn empty_latch_contains_nothing() {
        let latch = EdgeLatch::new();
        assert!(!latch.contains(u32::MAX));
    }
}
