//! Hardware-abstraction boundary for the Carver motion-controller firmware.
//!
//! This crate defines the interfaces the port subsystem consumes from its
//! collaborators: the physical pin driver, the cooperative realtime service,
//! and the persisted settings store. It also carries the static board pin
//! maps that name which auxiliary pins exist on a given board.
//!
//! Nothing in here touches hardware; concrete MCU drivers implement the
//! traits, and host tests implement them with mocks.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod board;
pub mod control;
pub mod pin;
pub mod realtime;
pub mod settings;

pub use self::control::ControlSignals;
pub use self::pin::{EdgeMode, GpioPort, PinAddress, PinDriver};
pub use self::realtime::Realtime;
pub use self::settings::{SettingId, SettingsStore};
