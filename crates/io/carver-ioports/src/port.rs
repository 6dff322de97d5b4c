//! Port descriptors and API surface types.
//!
//! One descriptor per physical pin, built once at initialization from the
//! board map and never moved afterwards; logical numbering is handled by
//! the remap table ([`crate::table`]).

use core::fmt::Write as _;

use carver_hal::board::{InputPinDef, OutputPinDef};
use carver_hal::{ControlSignals, EdgeMode, PinAddress};

/// Port class selector. Analog ports are managed elsewhere; every operation
/// in this crate reports failure for [`IoPortType::Analog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoPortType {
    /// Digital input/output ports.
    Digital,
    /// Analog ports (not handled by this subsystem).
    Analog,
}

/// Port direction selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDirection {
    /// Auxiliary inputs.
    Input,
    /// Auxiliary outputs.
    Output,
}

/// What a pin is assigned to, by physical slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    /// Auxiliary digital input `n`.
    AuxInput(u8),
    /// Auxiliary digital output `n`.
    AuxOutput(u8),
}

/// Edge-interrupt callback: receives the *logical* port number that fired
/// and the pin's current level. Invoked from interrupt context; must not
/// call back into the port subsystem.
pub type InterruptCallback = fn(port: u8, level: bool);

/// Display label attached to a port.
pub type Description = heapless::String<32>;

pub(crate) fn desc_from_str(s: &str) -> Description {
    let mut d = Description::new();
    // Over-capacity descriptions are truncated at a char boundary.
    for c in s.chars() {
        if d.push(c).is_err() {
            break;
        }
    }
    d
}

/// Auxiliary input descriptor (one physical slot).
pub(crate) struct AuxInput {
    pub addr: PinAddress,
    /// This pin's bit in the interrupt-line space.
    pub bit: u32,
    /// Edge modes the pin supports.
    pub caps: EdgeMode,
    /// Currently configured (registered) edge mode; empty when unarmed.
    pub irq_mode: EdgeMode,
    pub inverted: bool,
    pub claimed: bool,
    pub function: PinFunction,
    /// Machine-control signal this input doubles as.
    pub control: Option<ControlSignals>,
    pub description: Description,
    /// At most one registered callback per port.
    pub callback: Option<InterruptCallback>,
}

impl AuxInput {
    pub fn from_def(n: u8, def: &InputPinDef) -> Self {
        Self {
            addr: def.addr,
            bit: def.addr.bit(),
            caps: def.edge_caps,
            irq_mode: EdgeMode::empty(),
            inverted: false,
            claimed: false,
            function: PinFunction::AuxInput(n),
            control: def.control,
            description: input_label(n),
            callback: None,
        }
    }
}

/// Auxiliary output descriptor (one physical slot).
pub(crate) struct AuxOutput {
    pub addr: PinAddress,
    pub inverted: bool,
    pub claimed: bool,
    pub function: PinFunction,
    pub description: Description,
}

impl AuxOutput {
    pub fn from_def(n: u8, def: &OutputPinDef) -> Self {
        Self {
            addr: def.addr,
            inverted: false,
            claimed: false,
            function: PinFunction::AuxOutput(n),
            description: output_label(n),
        }
    }
}

pub(crate) fn input_label(n: u8) -> Description {
    let mut d = Description::new();
    let _ = write!(d, "Aux input {n}");
    d
}

pub(crate) fn output_label(n: u8) -> Description {
    let mut d = Description::new();
    let _ = write!(d, "Aux output {n}");
    d
}

/// Claim/relabel operations shared by both descriptor kinds.
pub(crate) trait AuxPort {
    fn is_claimed(&self) -> bool;
    fn set_claimed(&mut self, description: &str);
    /// Regenerates the display label after the port shifted to a new
    /// logical number. Labels are cosmetic; nothing parses them back.
    fn relabel(&mut self, logical: u8);
}

impl AuxPort for AuxInput {
    fn is_claimed(&self) -> bool {
        self.claimed
    }

    fn set_claimed(&mut self, description: &str) {
        self.claimed = true;
        self.description = desc_from_str(description);
    }

    fn relabel(&mut self, logical: u8) {
        self.description = input_label(logical);
    }
}

impl AuxPort for AuxOutput {
    fn is_claimed(&self) -> bool {
        self.claimed
    }

    fn set_claimed(&mut self, description: &str) {
        self.claimed = true;
        self.description = desc_from_str(description);
    }

    fn relabel(&mut self, logical: u8) {
        self.description = output_label(logical);
    }
}

/// Snapshot of one port's descriptor, as returned by
/// [`DigitalIo::pin_info`](crate::io::DigitalIo::pin_info).
#[derive(Debug, Clone)]
pub struct PinInfo {
    /// Pin assignment.
    pub function: PinFunction,
    /// Physical pin.
    pub addr: PinAddress,
    /// Interrupt-line bit (inputs; `1 << pin` for outputs).
    pub bit: u32,
    /// Supported edge modes (empty for outputs).
    pub edge_caps: EdgeMode,
    /// All aux ports support logical inversion.
    pub invert_capable: bool,
    /// Whether the port can still be claimed.
    pub claimable: bool,
    /// Current inversion state.
    pub inverted: bool,
    /// Whether the port has been claimed.
    pub claimed: bool,
    /// Currently configured edge mode (inputs).
    pub irq_mode: EdgeMode,
    /// Machine-control signal tie, if any.
    pub control: Option<ControlSignals>,
    /// Display label.
    pub description: Description,
}

#[cfg(test)]
mod tests {
    use super::*;
    use carver_hal::GpioPort;

    fn def(pin: u8) -> InputPinDef {
        InputPinDef {
            addr: PinAddress::new(GpioPort::C, pin),
            edge_caps: EdgeMode::CHANGE,
            control: None,
        }
    }

    #[test]
    fn descriptors_get_numbered_labels() {
        let input = AuxInput::from_def(2, &def(14));
        assert_eq!(input.description.as_str(), "Aux input 2");
        let output = AuxOutput::from_def(0, &OutputPinDef {
            addr: PinAddress::new(GpioPort::B, 13),
        });
        assert_eq!(output.description.as_str(), "Aux output 0");
    }

    #[test]
    fn claim_overwrites_label_and_flags() {
        let mut input = AuxInput::from_def(0, &def(14));
        input.set_claimed("Probe");
        assert!(input.is_claimed());
        assert_eq!(input.description.as_str(), "Probe");
        input.relabel(1);
        assert_eq!(input.description.as_str(), "Aux input 1");
    }

    #[test]
    fn over_capacity_descriptions_truncate() {
        let mut input = AuxInput::from_def(0, &def(14));
        let long = "Coolant flood relay on the spindle head breakout";
        input.set_claimed(long);
        assert_eq!(input.description.as_str(), &long[..32]);
    }

    #[test]
    fn interrupt_bit_tracks_pin_line() {
        let input = AuxInput::from_def(0, &def(13));
        assert_eq!(input.bit, 1 << 13);
    }
}
