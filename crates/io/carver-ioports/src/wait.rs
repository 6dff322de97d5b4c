//! Blocking digital-input reads with timeout.
//!
//! The firmware has no preemptive scheduler, so a "blocking" wait is a
//! cooperative retry loop: every quantum it hands control to the realtime
//! service, sleeps, and re-checks. Edge waits use the interrupt-driven
//! [`EdgeLatch`](crate::latch::EdgeLatch); level waits re-read the pin.

use carver_hal::{EdgeMode, PinAddress, PinDriver, Realtime, SettingsStore};

use crate::io::DigitalIo;
use crate::port::IoPortType;

/// Retry quantum for blocking waits, in milliseconds.
///
/// Every quantum the wait yields to the realtime service before sleeping;
/// that is the cooperative-scheduling contract for this subsystem.
pub const POLL_QUANTUM_MS: u32 = 50;

/// How a blocking input read waits for its condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Single instantaneous read; never blocks.
    Immediate,
    /// Poll until the (inversion-adjusted) level reads high.
    High,
    /// Poll until the level reads low.
    Low,
    /// Wait for a rising edge via the interrupt latch.
    Rise,
    /// Wait for a falling edge via the interrupt latch.
    Fall,
}

/// Descriptor fields copied out before the retry loop so the state guard is
/// never held across a sleep. Claim and swap run on the same main context
/// the wait blocks, so the snapshot cannot go stale mid-wait.
struct InputSnapshot {
    addr: PinAddress,
    bit: u32,
    caps: EdgeMode,
    /// Edge mode to restore when the wait exits.
    configured: EdgeMode,
    invert: bool,
}

/// Number of retry steps for a timeout in seconds: the timeout quantized to
/// 50 ms steps, rounded up, plus one grace step so `timeout = 0` still
/// performs one check.
fn wait_steps(timeout_secs: f32) -> u32 {
    let steps = timeout_secs * (1000.0 / POLL_QUANTUM_MS as f32);
    let mut whole = steps as u32;
    if (whole as f32) < steps {
        whole += 1;
    }
    whole + 1
}

impl<P: PinDriver, R: Realtime, S: SettingsStore> DigitalIo<P, R, S> {
    /// Reads an auxiliary input, optionally blocking for a level or edge.
    ///
    /// Returns the inversion-adjusted level (`0` or `1`), or `-1` on
    /// timeout, abort, unsupported edge capability, or an out-of-range
    /// port. Callers that need to tell "timed out" from "not supported"
    /// must check the port's capabilities first; the sentinel does not
    /// distinguish them.
    pub fn wait_on_input(
        &self,
        ty: IoPortType,
        port: u8,
        mode: WaitMode,
        timeout_secs: f32,
    ) -> i32 {
        if ty != IoPortType::Digital {
            return -1;
        }
        let snapshot = {
            let state = self.state.lock();
            let Some(physical) = state.in_map.to_physical(port) else {
                return -1;
            };
            let input = &state.inputs[physical as usize];
            InputSnapshot {
                addr: input.addr,
                bit: input.bit,
                caps: input.caps,
                configured: input.irq_mode,
                invert: self.settings.invert_in() & (1 << physical) != 0,
            }
        };
        self.get_input(&snapshot, mode, timeout_secs)
    }

    fn get_input(&self, input: &InputSnapshot, mode: WaitMode, timeout_secs: f32) -> i32 {
        let read = || self.pins.read_pin(input.addr) ^ input.invert;

        if mode == WaitMode::Immediate {
            return i32::from(read());
        }

        let mut remaining = wait_steps(timeout_secs);
        let mut value = -1;

        match mode {
            WaitMode::Rise | WaitMode::Fall => {
                let edge = if mode == WaitMode::Rise {
                    EdgeMode::RISING
                } else {
                    EdgeMode::FALLING
                };
                if !input.caps.contains(edge) {
                    return -1;
                }

                self.latch.clear(input.bit);
                self.pins.set_edge_detection(input.addr, edge);

                loop {
                    if self.latch.contains(input.bit) {
                        value = i32::from(read());
                        break;
                    }
                    self.rt.poll_realtime();
                    self.rt.delay_ms(POLL_QUANTUM_MS);
                    remaining -= 1;
                    if remaining == 0 || self.rt.aborted() {
                        break;
                    }
                }

                // The arm above is transient; put back whatever the port
                // had configured via interrupt registration.
                if input.configured.is_empty() {
                    self.pins.disable_edge_detection(input.addr);
                } else {
                    self.pins.set_edge_detection(input.addr, input.configured);
                }
            }

            WaitMode::High | WaitMode::Low => {
                let wait_for = mode != WaitMode::Low;
                loop {
                    if read() == wait_for {
                        value = i32::from(read());
                        break;
                    }
                    self.rt.poll_realtime();
                    self.rt.delay_ms(POLL_QUANTUM_MS);
                    remaining -= 1;
                    if remaining == 0 || self.rt.aborted() {
                        break;
                    }
                }
            }

            WaitMode::Immediate => unreachable!(),
        }

        value
    }
}
