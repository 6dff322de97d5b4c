//! Logical-to-physical port remapping.
//!
//! Physical descriptors never move; the table holds one [`PortMap`] per
//! direction translating a stable logical port number to a physical slot
//! index. Claiming a port edits the map only: the claimed slot is parked
//! past the visible boundary and everything after it shifts down one, so
//! the externally visible numbering stays contiguous. Contrast with the
//! swap operation ([`DigitalIo::swap`](crate::io::DigitalIo::swap)), which
//! exchanges descriptor *content* and leaves the map alone.

use heapless::Vec;

/// Remap array for one port direction.
///
/// Invariant: `map` is a permutation of `0..len`; entries at indices
/// `visible..len` are the claimed slots.
pub(crate) struct PortMap<const N: usize> {
    map: Vec<u8, N>,
    visible: u8,
}

impl<const N: usize> PortMap<N> {
    /// Builds the identity mapping over `n` physical slots.
    ///
    /// Returns `None` if the board declares more slots than the table
    /// capacity.
    pub fn identity(n: usize) -> Option<Self> {
        if n > N {
            return None;
        }
        let mut map = Vec::new();
        for i in 0..n {
            // Capacity checked above.
            let _ = map.push(i as u8);
        }
        Some(Self {
            map,
            visible: n as u8,
        })
    }

    /// Number of physical slots (claimed ones included).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Number of externally visible (unclaimed) ports.
    pub fn visible(&self) -> u8 {
        self.visible
    }

    /// Forward lookup: logical port number to physical slot.
    ///
    /// Indices in `visible..len` address claimed slots; claimers keep using
    /// them after a successful claim.
    pub fn to_physical(&self, logical: u8) -> Option<u8> {
        self.map.get(logical as usize).copied()
    }

    /// Reverse lookup: physical slot to logical port number.
    ///
    /// Linear scan; no reverse index is kept, the tables are single-digit
    /// sized.
    pub fn to_logical(&self, physical: u8) -> Option<u8> {
        self.map
            .iter()
            .position(|&p| p == physical)
            .map(|i| i as u8)
    }

    /// Removes `logical` from the visible range, parking its physical slot
    /// at the new tail.
    ///
    /// Entries between `logical` and the old tail shift down one. Returns
    /// the physical slot and its new (claimed-space) logical index. The
    /// caller is responsible for checking the slot is not already claimed;
    /// indices at or past the visible boundary always address claimed slots
    /// and must be rejected before calling this.
    pub fn claim_slot(&mut self, logical: u8) -> Option<(u8, u8)> {
        let physical = self.to_physical(logical)?;
        let l = logical as usize;
        let vis = self.visible as usize;
        if l >= vis {
            return None;
        }
        for i in l..vis - 1 {
            self.map[i] = self.map[i + 1];
        }
        self.visible -= 1;
        self.map[vis - 1] = physical;
        Some((physical, self.visible))
    }
}
