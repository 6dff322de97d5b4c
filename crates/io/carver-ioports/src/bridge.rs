//! Inversion state and its bridge to the persisted settings.
//!
//! Three persisted masks concern this subsystem: the per-direction port
//! inversion masks (bit per physical port) and the machine-control
//! inversion mask. A control-tied input appears in two of them, so changes
//! to either side are mirrored into the other and a re-save is requested
//! when that happens.

use carver_hal::{PinDriver, Realtime, SettingId, SettingsStore};

use crate::io::DigitalIo;

impl<P: PinDriver, R: Realtime, S: SettingsStore> DigitalIo<P, R, S> {
    /// Reacts to a single settings-change notification.
    pub fn on_setting_changed(&self, id: SettingId) {
        let mut save = false;
        let mut state = self.state.lock();

        match id {
            SettingId::InvertInputs => {
                let mask = self.settings.invert_in();
                for physical in (0..state.inputs.len()).rev() {
                    let inverted = mask & (1 << physical) != 0;
                    let input = &mut state.inputs[physical];
                    input.inverted = inverted;
                    if let Some(signal) = input.control {
                        // Mirror the port inversion into the control mask.
                        save = true;
                        let mut control = self.settings.control_invert();
                        control.set(signal, inverted);
                        self.settings.set_control_invert(control);
                    }
                }
            }

            SettingId::InvertOutputs => {
                let mask = self.settings.invert_out();
                if state.out_invert_cache != mask {
                    for physical in (0..state.outputs.len()).rev() {
                        let bit = 1u32 << physical;
                        state.outputs[physical].inverted = mask & bit != 0;
                        if (mask ^ state.out_invert_cache) & bit != 0 {
                            // The inversion sense changed under an already
                            // driven pin; toggle the electrical level so
                            // the logical level is preserved.
                            let addr = state.outputs[physical].addr;
                            self.pins.write_pin(addr, !self.pins.read_pin(addr));
                        }
                    }
                    state.out_invert_cache = mask;
                }
            }

            SettingId::ControlInvert => {
                let control = self.settings.control_invert();
                for physical in (0..state.inputs.len()).rev() {
                    if let Some(signal) = state.inputs[physical].control {
                        save = true;
                        let bit = 1u32 << physical;
                        let mut mask = self.settings.invert_in();
                        if control.intersects(signal) {
                            mask |= bit;
                        } else {
                            mask &= !bit;
                        }
                        self.settings.set_invert_in(mask);
                        state.inputs[physical].inverted = mask & bit != 0;
                    }
                }
            }
        }

        drop(state);
        if save {
            self.settings.commit();
        }
    }

    /// Re-derives all per-port inversion state after a full settings load.
    ///
    /// Outputs are driven once to their idle (logical low) electrical
    /// level. For control-tied inputs the control mask is authoritative:
    /// a disagreeing port-inversion bit is rewritten from it and a re-save
    /// is requested.
    pub fn on_settings_loaded(&self) {
        let mut save = false;
        let mut state = self.state.lock();

        let out_mask = self.settings.invert_out();
        state.out_invert_cache = out_mask;
        for physical in (0..state.outputs.len()).rev() {
            let inverted = out_mask & (1 << physical) != 0;
            let out = &mut state.outputs[physical];
            out.inverted = inverted;
            self.pins.write_pin(out.addr, inverted);
        }

        let control = self.settings.control_invert();
        for physical in (0..state.inputs.len()).rev() {
            let bit = 1u32 << physical;
            if let Some(signal) = state.inputs[physical].control {
                let control_inverted = control.intersects(signal);
                let mut mask = self.settings.invert_in();
                if control_inverted != (mask & bit != 0) {
                    save = true;
                    if control_inverted {
                        mask |= bit;
                    } else {
                        mask &= !bit;
                    }
                    self.settings.set_invert_in(mask);
                }
            }
            state.inputs[physical].inverted = self.settings.invert_in() & bit != 0;
        }

        drop(state);
        if save {
            log::warn!("ioports: reconciled input inversion from control mask, re-saving");
            self.settings.commit();
        }
    }
}
