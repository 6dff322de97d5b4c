//! Static board pin maps.
//!
//! Each supported board contributes a compile-time list of the auxiliary
//! digital pins it exposes. The port subsystem consumes these once at
//! initialization to size its descriptor tables; nothing here is mutated
//! at runtime.

use crate::control::ControlSignals;
use crate::pin::{EdgeMode, PinAddress};

/// One auxiliary digital input as declared by a board map.
#[derive(Debug, Clone, Copy)]
pub struct InputPinDef {
    /// Physical pin.
    pub addr: PinAddress,
    /// Edge-trigger modes the pin's interrupt line supports.
    pub edge_caps: EdgeMode,
    /// Machine-control signal this input doubles as, if any.
    pub control: Option<ControlSignals>,
}

/// One auxiliary digital output as declared by a board map.
#[derive(Debug, Clone, Copy)]
pub struct OutputPinDef {
    /// Physical pin.
    pub addr: PinAddress,
}

/// Reference board ("Carver controller" breakout).
///
/// Aux input line numbers must be distinct: edge interrupts are
/// multiplexed per line, see [`PinAddress::bit`].
pub mod carver_controller {
    use super::{ControlSignals, EdgeMode, InputPinDef, OutputPinDef, PinAddress};
    use crate::pin::GpioPort;

    /// Auxiliary digital inputs. Input 1 doubles as the safety-door switch.
    pub const AUX_IN: &[InputPinDef] = &[
        InputPinDef {
            addr: PinAddress::new(GpioPort::C, 14),
            edge_caps: EdgeMode::CHANGE,
            control: None,
        },
        InputPinDef {
            addr: PinAddress::new(GpioPort::C, 13),
            edge_caps: EdgeMode::CHANGE,
            control: Some(ControlSignals::SAFETY_DOOR),
        },
        InputPinDef {
            addr: PinAddress::new(GpioPort::A, 15),
            edge_caps: EdgeMode::empty(),
            control: None,
        },
    ];

    /// Auxiliary digital outputs.
    pub const AUX_OUT: &[OutputPinDef] = &[
        OutputPinDef { addr: PinAddress::new(GpioPort::B, 13) },
        OutputPinDef { addr: PinAddress::new(GpioPort::B, 14) },
        OutputPinDef { addr: PinAddress::new(GpioPort::B, 12) },
        OutputPinDef { addr: PinAddress::new(GpioPort::B, 10) },
    ];
}
