//! Edge-interrupt dispatch and per-port callback registration.

use carver_hal::{EdgeMode, PinDriver, Realtime, SettingsStore};

use crate::io::DigitalIo;
use crate::port::InterruptCallback;

impl<P: PinDriver, R: Realtime, S: SettingsStore> DigitalIo<P, R, S> {
    /// Interrupt entry point: called by the pin driver's edge-interrupt
    /// handler with the set of interrupt-line bits that fired.
    ///
    /// Latches the fired bits for any pending wait, then walks the input
    /// descriptors from the highest physical index down and invokes each
    /// matching port's callback with its *logical* number and current
    /// level. The high-to-low order is a tie-break, nothing more; all
    /// matching ports are serviced exactly once per dispatch.
    ///
    /// Runs inside the table's spin guard. The guard is only ever held for
    /// short critical sections on the main context (never across a sleep),
    /// so acquisition here busy-waits briefly instead of blocking.
    pub fn on_edge_event(&self, bits: u32) {
        let state = self.state.lock();
        self.latch.merge(bits);

        let mut physical = state.inputs.len();
        while physical > 0 {
            physical -= 1;
            let input = &state.inputs[physical];
            if input.bit & bits != 0 {
                if let (Some(callback), Some(logical)) =
                    (input.callback, state.in_map.to_logical(physical as u8))
                {
                    callback(logical, self.pins.read_pin(input.addr));
                }
            }
        }
    }

    /// Registers (or replaces) a port's edge-interrupt callback and arms
    /// the hardware for `mode`.
    ///
    /// Fails for out-of-range ports, ports with no edge capability at all,
    /// a `mode` that is not a subset of the port's capabilities, or a
    /// missing callback. Passing an empty `mode` — or any failure past the
    /// capability gate — unregisters instead: any in-flight dispatch is
    /// waited out, hardware detection is disabled, and the stored mode and
    /// callback are cleared. At most one callback per port.
    pub fn register_interrupt_handler(
        &self,
        port: u8,
        mode: EdgeMode,
        callback: Option<InterruptCallback>,
    ) -> bool {
        // Taking the guard also waits out any dispatch currently running,
        // so a callback is never cleared while it is being invoked.
        let mut state = self.state.lock();
        let Some(physical) = state.in_map.to_physical(port) else {
            return false;
        };
        let input = &mut state.inputs[physical as usize];
        if input.caps.is_empty() {
            return false;
        }

        let ok = input.caps.contains(mode) && callback.is_some();
        if ok {
            input.irq_mode = mode;
            input.callback = callback;
            self.pins.set_edge_detection(input.addr, mode);
            log::debug!("ioports: armed irq {mode:?} on aux input {port}");
        }
        if mode.is_empty() || !ok {
            self.pins.disable_edge_detection(input.addr);
            input.irq_mode = EdgeMode::empty();
            input.callback = None;
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::mock::{test_io, IN0, IN1, IN2};
    use crate::port::{IoDirection, IoPortType};

    fn nop(_: u8, _: bool) {}

    #[test]
    fn register_arms_the_requested_edge() {
        let (io, pins, _, _) = test_io();
        assert!(io.register_interrupt_handler(0, EdgeMode::RISING, Some(nop)));
        assert_eq!(pins.armed(IN0), EdgeMode::RISING);
        let info = io.pin_info(IoPortType::Digital, IoDirection::Input, 0).unwrap();
        assert_eq!(info.irq_mode, EdgeMode::RISING);
    }

    #[test]
    fn register_rejects_out_of_range_ports() {
        let (io, _, _, _) = test_io();
        assert!(!io.register_interrupt_handler(7, EdgeMode::RISING, Some(nop)));
    }

    #[test]
    fn register_rejects_ports_without_edge_capability() {
        let (io, pins, _, _) = test_io();
        assert!(!io.register_interrupt_handler(2, EdgeMode::RISING, Some(nop)));
        // The capability gate fails before anything touches hardware.
        assert_eq!(pins.armed(IN2), EdgeMode::empty());
    }

    #[test]
    fn register_without_callback_unregisters() {
        let (io, pins, _, _) = test_io();
        assert!(io.register_interrupt_handler(0, EdgeMode::RISING, Some(nop)));
        assert!(!io.register_interrupt_handler(0, EdgeMode::FALLING, None));
        assert_eq!(pins.armed(IN0), EdgeMode::empty());
        let info = io.pin_info(IoPortType::Digital, IoDirection::Input, 0).unwrap();
        assert_eq!(info.irq_mode, EdgeMode::empty());
    }

    #[test]
    fn empty_mode_unregisters() {
        let (io, pins, _, _) = test_io();
        assert!(io.register_interrupt_handler(0, EdgeMode::CHANGE, Some(nop)));
        io.register_interrupt_handler(0, EdgeMode::empty(), Some(nop));
        assert_eq!(pins.armed(IN0), EdgeMode::empty());
        let info = io.pin_info(IoPortType::Digital, IoDirection::Input, 0).unwrap();
        assert_eq!(info.irq_mode, EdgeMode::empty());
    }

    #[test]
    fn dispatch_latches_and_invokes_with_logical_port() {
        static CALLS: Mutex<Vec<(u8, bool)>> = Mutex::new(Vec::new());
        let (io, pins, _, _) = test_io();
        assert!(io.register_interrupt_handler(
            1,
            EdgeMode::FALLING,
            Some(|port, level| CALLS.lock().unwrap().push((port, level))),
        ));
        pins.set_level(IN1, true);
        io.on_edge_event(IN1.bit());
        assert!(io.latch.contains(IN1.bit()));
        assert_eq!(CALLS.lock().unwrap().as_slice(), &[(1, true)]);
    }

    #[test]
    fn dispatch_services_matching_ports_highest_physical_first() {
        static CALLS: Mutex<Vec<u8>> = Mutex::new(Vec::new());
        let (io, _, _, _) = test_io();
        for port in [0u8, 1] {
            assert!(io.register_interrupt_handler(
                port,
                EdgeMode::RISING,
                Some(|port, _| CALLS.lock().unwrap().push(port)),
            ));
        }
        io.on_edge_event(IN0.bit() | IN1.bit());
        assert_eq!(CALLS.lock().unwrap().as_slice(), &[1, 0]);
    }

    #[test]
    fn dispatch_reports_logical_numbers_after_a_claim() {
        static CALLS: Mutex<Vec<u8>> = Mutex::new(Vec::new());
        let (io, _, _, _) = test_io();
        let mut port = 0u8;
        assert!(io.claim(IoPortType::Digital, IoDirection::Input, &mut port, "claimed"));
        // The old physical slot 1 is now logical 0.
        assert!(io.register_interrupt_handler(
            0,
            EdgeMode::RISING,
            Some(|port, _| CALLS.lock().unwrap().push(port)),
        ));
        io.on_edge_event(IN1.bit());
        assert_eq!(CALLS.lock().unwrap().as_slice(), &[0]);
    }

    #[test]
    fn dispatch_without_callbacks_only_latches() {
        let (io, _, _, _) = test_io();
        io.on_edge_event(IN0.bit());
        assert!(io.latch.contains(IN0.bit()));
    }
}
