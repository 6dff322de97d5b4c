//! Physical pin identity and the pin-driver interface.
//!
//! A [`PinAddress`] names one real pin (GPIO bank + line number). The port
//! subsystem never touches registers itself; it goes through a [`PinDriver`]
//! implementation, which on the reference MCU is a thin wrapper over the
//! GPIO and EXTI peripherals.

use bitflags::bitflags;

/// GPIO banks available on the reference MCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpioPort {
    /// Bank A.
    A,
    /// Bank B.
    B,
    /// Bank C.
    C,
    /// Bank D.
    D,
    /// Bank E.
    E,
}

/// Identity of one physical pin: a GPIO bank and a line number (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinAddress {
    /// GPIO bank the pin lives on.
    pub port: GpioPort,
    /// Line number within the bank.
    pub pin: u8,
}

impl PinAddress {
    /// Creates a pin address.
    pub const fn new(port: GpioPort, pin: u8) -> Self {
        Self { port, pin }
    }

    /// The pin's bit in the interrupt-line space.
    ///
    /// Edge interrupts are multiplexed per line number, so two pins on the
    /// same line cannot both be edge sources. Board maps must keep aux input
    /// line numbers distinct.
    pub const fn bit(self) -> u32 {
        1 << self.pin
    }
}

bitflags! {
    /// Edge-trigger modes a pin supports or is armed with.
    ///
    /// An empty set means no edge detection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EdgeMode: u8 {
        /// Trigger on a low-to-high transition.
        const RISING  = 1 << 0;
        /// Trigger on a high-to-low transition.
        const FALLING = 1 << 1;
        /// Trigger on either transition.
        const CHANGE  = Self::RISING.bits() | Self::FALLING.bits();
    }
}

/// Raw digital pin driver.
///
/// All methods take `&self` and must be callable from interrupt context;
/// implementations synchronise internally (register access on the reference
/// MCU is word-atomic, so the hardware driver needs no locking).
pub trait PinDriver {
    /// Reads the current electrical level of a pin.
    fn read_pin(&self, addr: PinAddress) -> bool;

    /// Drives a pin to the given electrical level.
    fn write_pin(&self, addr: PinAddress, high: bool);

    /// Arms edge-interrupt detection for a pin.
    ///
    /// Passing an empty `mode` is equivalent to
    /// [`disable_edge_detection`](Self::disable_edge_detection).
    fn set_edge_detection(&self, addr: PinAddress, mode: EdgeMode);

    /// Disarms edge-interrupt detection for a pin.
    fn disable_edge_detection(&self, addr: PinAddress);
}

#[cfg(feature = "alloc")]
impl<T: PinDriver + ?Sized> PinDriver for alloc::sync::Arc<T> {
    fn read_pin(&self, addr: PinAddress) -> bool {
        (**self).read_pin(addr)
    }

    fn write_pin(&self, addr: PinAddress, high: bool) {
        (**self).write_pin(addr, high);
    }

    fn set_edge_detection(&self, addr: PinAddress, mode: EdgeMode) {
        (**self).set_edge_detection(addr, mode);
    }

    fn disable_edge_detection(&self, addr: PinAddress) {
        (**self).disable_edge_detection(addr);
    }
}
