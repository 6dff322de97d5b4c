//! Dynamic auxiliary digital I/O port table.
//!
//! The board exposes a fixed set of auxiliary digital pins; this crate turns
//! them into a logical, renumberable port table the rest of the firmware can
//! claim, invert, query, and wait on, independent of the physical pin
//! layout. Logical port numbers stay contiguous as internal features claim
//! ports for exclusive use.
//!
//! The subsystem runs on the firmware's single cooperative main context.
//! The only asynchronous entry point is [`DigitalIo::on_edge_event`], called
//! from the pin driver's interrupt handler; it shares an atomic edge latch
//! and a short spin-guarded critical section with the main context, and
//! nothing else.
//!
//! Like the rest of the firmware's hardware-facing API, operations report
//! failure with `false` or a `-1` sentinel rather than panicking; a range
//! error is always a caller bug.

#![cfg_attr(not(test), no_std)]

pub mod bridge;
pub mod io;
pub mod irq;
pub mod latch;
pub mod port;
pub mod table;
pub mod wait;

#[cfg(test)]
pub(crate) mod mock;

pub use self::io::{DigitalIo, InitError};
pub use self::latch::EdgeLatch;
pub use self::port::{Description, InterruptCallback, IoDirection, IoPortType, PinFunction, PinInfo};
pub use self::wait::{WaitMode, POLL_QUANTUM_MS};
