//! Persisted settings store interface.
//!
//! The port subsystem owns three persisted bitmasks: per-direction port
//! inversion masks (bit per *physical* port) and the control-signal
//! inversion mask. The store delivers change notifications by
//! [`SettingId`]; the subsystem reacts by re-deriving per-port state and
//! may write masks back and request a commit.

use crate::control::ControlSignals;

/// Identifiers for settings-change notifications the port subsystem
/// subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingId {
    /// The input-port inversion mask changed.
    InvertInputs,
    /// The output-port inversion mask changed.
    InvertOutputs,
    /// The machine-control inversion mask changed.
    ControlInvert,
}

/// Access to the persisted I/O settings.
///
/// Methods take `&self`; implementations use interior mutability. All
/// access happens on the main context, never from interrupts.
pub trait SettingsStore {
    /// Input-port inversion mask, bit per physical input port.
    fn invert_in(&self) -> u32;
    /// Replaces the input-port inversion mask.
    fn set_invert_in(&self, mask: u32);

    /// Output-port inversion mask, bit per physical output port.
    fn invert_out(&self) -> u32;

    /// Machine-control inversion mask.
    fn control_invert(&self) -> ControlSignals;
    /// Replaces the machine-control inversion mask.
    fn set_control_invert(&self, mask: ControlSignals);

    /// Persists the current settings.
    fn commit(&self);
}

#[cfg(feature = "alloc")]
impl<T: SettingsStore + ?Sized> SettingsStore for alloc::sync::Arc<T> {
    fn invert_in(&self) -> u32 {
        (**self).invert_in()
    }

    fn set_invert_in(&self, mask: u32) {
        (**self).set_invert_in(mask);
    }

    fn invert_out(&self) -> u32 {
        (**self).invert_out()
    }

    fn control_invert(&self) -> ControlSignals {
        (**self).control_invert()
    }

    fn set_control_invert(&self, mask: ControlSignals) {
        (**self).set_control_invert(mask);
    }

    fn commit(&self) {
        (**self).commit();
    }
}
