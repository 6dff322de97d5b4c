//! The digital I/O port subsystem core.
//!
//! [`DigitalIo`] owns the descriptor arena (sized once from the board map,
//! never reallocated), the per-direction remap tables, and the edge latch.
//! It is generic over its three collaborators: the raw pin driver, the
//! cooperative realtime service, and the persisted settings store.
//!
//! All mutation except [`on_edge_event`](DigitalIo::on_edge_event) happens
//! on the main context. The descriptor arena sits behind a spin guard so
//! the interrupt path can take the same short critical section without a
//! blocking lock.

use core::fmt;

use carver_hal::board::{InputPinDef, OutputPinDef};
use carver_hal::{PinDriver, Realtime, SettingsStore};
use heapless::Vec;
use spin::Mutex;

use crate::latch::EdgeLatch;
use crate::port::{desc_from_str, AuxInput, AuxOutput, AuxPort, IoDirection, IoPortType};
use crate::port::{PinFunction, PinInfo};
use crate::table::PortMap;

/// Maximum auxiliary inputs a board map may declare.
pub(crate) const MAX_AUX_IN: usize = 8;
/// Maximum auxiliary outputs a board map may declare.
pub(crate) const MAX_AUX_OUT: usize = 8;

/// Error returned when the port tables cannot be built from the board map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The board declares more aux inputs than the table capacity.
    TooManyInputs,
    /// The board declares more aux outputs than the table capacity.
    TooManyOutputs,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyInputs => f.write_str("board declares too many aux inputs"),
            Self::TooManyOutputs => f.write_str("board declares too many aux outputs"),
        }
    }
}

/// Descriptor arena plus remap tables; everything behind the spin guard.
pub(crate) struct PortState {
    pub inputs: Vec<AuxInput, MAX_AUX_IN>,
    pub outputs: Vec<AuxOutput, MAX_AUX_OUT>,
    pub in_map: PortMap<MAX_AUX_IN>,
    pub out_map: PortMap<MAX_AUX_OUT>,
    /// Cached copy of the persisted output-inversion mask, used to detect
    /// which bits actually flipped on a settings change.
    pub out_invert_cache: u32,
}

/// The auxiliary digital port table.
pub struct DigitalIo<P, R, S> {
    pub(crate) pins: P,
    pub(crate) rt: R,
    pub(crate) settings: S,
    pub(crate) state: Mutex<PortState>,
    pub(crate) latch: EdgeLatch,
}

impl<P, R, S> fmt::Debug for DigitalIo<P, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitalIo").finish_non_exhaustive()
    }
}

impl<P: PinDriver, R: Realtime, S: SettingsStore> DigitalIo<P, R, S> {
    /// Builds the port table from a board's static pin lists.
    ///
    /// Descriptors are constructed once here and never destroyed; both
    /// remap tables start as the identity.
    pub fn new(
        pins: P,
        rt: R,
        settings: S,
        aux_in: &[InputPinDef],
        aux_out: &[OutputPinDef],
    ) -> Result<Self, InitError> {
        let mut inputs = Vec::new();
        for (n, def) in aux_in.iter().enumerate() {
            inputs
                .push(AuxInput::from_def(n as u8, def))
                .map_err(|_| InitError::TooManyInputs)?;
        }
        let mut outputs = Vec::new();
        for (n, def) in aux_out.iter().enumerate() {
            outputs
                .push(AuxOutput::from_def(n as u8, def))
                .map_err(|_| InitError::TooManyOutputs)?;
        }
        let in_map = PortMap::identity(inputs.len()).ok_or(InitError::TooManyInputs)?;
        let out_map = PortMap::identity(outputs.len()).ok_or(InitError::TooManyOutputs)?;

        log::info!(
            "ioports: {} aux in, {} aux out",
            inputs.len(),
            outputs.len()
        );

        Ok(Self {
            pins,
            rt,
            settings,
            state: Mutex::new(PortState {
                inputs,
                outputs,
                in_map,
                out_map,
                out_invert_cache: 0,
            }),
            latch: EdgeLatch::new(),
        })
    }

    /// Number of externally visible (unclaimed) ports for a direction.
    pub fn visible_ports(&self, dir: IoDirection) -> u8 {
        let state = self.state.lock();
        match dir {
            IoDirection::Input => state.in_map.visible(),
            IoDirection::Output => state.out_map.visible(),
        }
    }

    /// Reserves a logical port for exclusive use by an internal feature.
    ///
    /// On success the port disappears from the visible range (later ports
    /// shift down one and get relabeled), and `*port` is rewritten to the
    /// claimed-space index the caller keeps using to address the same
    /// physical pin. Claiming an out-of-range or already-claimed port
    /// leaves the table unchanged.
    pub fn claim(
        &self,
        ty: IoPortType,
        dir: IoDirection,
        port: &mut u8,
        description: &str,
    ) -> bool {
        if ty != IoPortType::Digital {
            return false;
        }
        let requested = *port;
        let mut state = self.state.lock();
        let state = &mut *state;
        let ok = match dir {
            IoDirection::Input => {
                claim_port(&mut state.inputs, &mut state.in_map, port, description)
            }
            IoDirection::Output => {
                claim_port(&mut state.outputs, &mut state.out_map, port, description)
            }
        };
        if ok {
            log::debug!("ioports: claimed {dir:?} port {requested} as \"{description}\"");
        }
        ok
    }

    /// Exchanges the physical identities of two ports.
    ///
    /// A full-content swap at the physical-slot level: every descriptor
    /// field moves except the description, which stays attached to the
    /// logical role. Swapping a port with itself trivially succeeds.
    /// Inputs with a registered interrupt callback refuse to swap, so a
    /// live interrupt source never changes logical number under its
    /// callback.
    pub fn swap(&self, ty: IoPortType, dir: IoDirection, port_a: u8, port_b: u8) -> bool {
        if port_a == port_b {
            return true;
        }
        if ty != IoPortType::Digital {
            return false;
        }
        let (a, b) = if port_a < port_b {
            (port_a as usize, port_b as usize)
        } else {
            (port_b as usize, port_a as usize)
        };
        let mut state = self.state.lock();
        let ok = match dir {
            IoDirection::Input => {
                if b >= state.inputs.len()
                    || state.inputs[a].callback.is_some()
                    || state.inputs[b].callback.is_some()
                {
                    false
                } else {
                    state.inputs.swap(a, b);
                    let (lo, hi) = state.inputs.split_at_mut(b);
                    core::mem::swap(&mut lo[a].description, &mut hi[0].description);
                    true
                }
            }
            IoDirection::Output => {
                if b >= state.outputs.len() {
                    false
                } else {
                    state.outputs.swap(a, b);
                    let (lo, hi) = state.outputs.split_at_mut(b);
                    core::mem::swap(&mut lo[a].description, &mut hi[0].description);
                    true
                }
            }
        };
        if ok {
            log::debug!("ioports: swapped {dir:?} ports {port_a} and {port_b}");
        }
        ok
    }

    /// Drives an auxiliary output, applying the port's persisted inversion.
    ///
    /// Out-of-range ports are ignored.
    pub fn digital_out(&self, port: u8, on: bool) {
        let state = self.state.lock();
        if let Some(physical) = state.out_map.to_physical(port) {
            let out = &state.outputs[physical as usize];
            let invert = self.settings.invert_out() & (1 << physical) != 0;
            self.pins.write_pin(out.addr, on ^ invert);
        }
    }

    /// Current logical level of an auxiliary output: driven level XOR
    /// inversion. `-1.0` if `info` is not an output of this table.
    pub fn output_state(&self, info: &PinInfo) -> f32 {
        let PinFunction::AuxOutput(physical) = info.function else {
            return -1.0;
        };
        let state = self.state.lock();
        match state.outputs.get(physical as usize) {
            Some(out) => f32::from(u8::from(self.pins.read_pin(out.addr) ^ out.inverted)),
            None => -1.0,
        }
    }

    /// Current logical level of an auxiliary input. `-1.0` if `info` is not
    /// an input of this table.
    pub fn input_state(&self, info: &PinInfo) -> f32 {
        let PinFunction::AuxInput(physical) = info.function else {
            return -1.0;
        };
        let state = self.state.lock();
        match state.inputs.get(physical as usize) {
            Some(input) => f32::from(u8::from(self.pins.read_pin(input.addr) ^ input.inverted)),
            None => -1.0,
        }
    }

    /// Snapshot of a port's descriptor, or `None` for out-of-range ports
    /// and analog requests.
    pub fn pin_info(&self, ty: IoPortType, dir: IoDirection, port: u8) -> Option<PinInfo> {
        if ty != IoPortType::Digital {
            return None;
        }
        let state = self.state.lock();
        match dir {
            IoDirection::Input => {
                let physical = state.in_map.to_physical(port)?;
                let input = &state.inputs[physical as usize];
                Some(PinInfo {
                    function: input.function,
                    addr: input.addr,
                    bit: input.bit,
                    edge_caps: input.caps,
                    invert_capable: true,
                    claimable: !input.claimed,
                    inverted: input.inverted,
                    claimed: input.claimed,
                    irq_mode: input.irq_mode,
                    control: input.control,
                    description: input.description.clone(),
                })
            }
            IoDirection::Output => {
                let physical = state.out_map.to_physical(port)?;
                let out = &state.outputs[physical as usize];
                Some(PinInfo {
                    function: out.function,
                    addr: out.addr,
                    bit: out.addr.bit(),
                    edge_caps: carver_hal::EdgeMode::empty(),
                    invert_capable: true,
                    claimable: !out.claimed,
                    inverted: self.settings.invert_out() & (1 << physical) != 0,
                    claimed: out.claimed,
                    irq_mode: carver_hal::EdgeMode::empty(),
                    control: None,
                    description: out.description.clone(),
                })
            }
        }
    }

    /// Overwrites a port's display label.
    pub fn set_pin_description(&self, ty: IoPortType, dir: IoDirection, port: u8, text: &str) {
        if ty != IoPortType::Digital {
            return;
        }
        let mut state = self.state.lock();
        match dir {
            IoDirection::Input => {
                if let Some(physical) = state.in_map.to_physical(port) {
                    state.inputs[physical as usize].description = desc_from_str(text);
                }
            }
            IoDirection::Output => {
                if let Some(physical) = state.out_map.to_physical(port) {
                    state.outputs[physical as usize].description = desc_from_str(text);
                }
            }
        }
    }
}

/// Claims `*port` in one direction: checks the claimed flag, edits the map,
/// relabels the shifted ports, and rewrites `*port` to its claimed-space
/// index.
fn claim_port<T: AuxPort, const N: usize>(
    ports: &mut [T],
    map: &mut PortMap<N>,
    port: &mut u8,
    description: &str,
) -> bool {
    let Some(physical) = map.to_physical(*port) else {
        return false;
    };
    if ports[physical as usize].is_claimed() {
        return false;
    }
    let Some((physical, new_logical)) = map.claim_slot(*port) else {
        return false;
    };
    // Ports that shifted down regain a label matching their new number.
    for logical in *port..map.visible() {
        if let Some(p) = map.to_physical(logical) {
            ports[p as usize].relabel(logical);
        }
    }
    ports[physical as usize].set_claimed(description);
    *port = new_logical;
    true
}
