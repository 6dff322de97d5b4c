//! Machine-control signal capabilities.

use bitflags::bitflags;

bitflags! {
    /// Named machine-control signals an auxiliary input can double as.
    ///
    /// The inversion state of a control-tied input is mirrored into the
    /// persisted control-inversion mask using these bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlSignals: u16 {
        /// Soft-reset / e-stop input.
        const RESET       = 1 << 0;
        /// Feed-hold input.
        const FEED_HOLD   = 1 << 1;
        /// Cycle-start input.
        const CYCLE_START = 1 << 2;
        /// Safety-door switch input.
        const SAFETY_DOOR = 1 << 3;
    }
}
