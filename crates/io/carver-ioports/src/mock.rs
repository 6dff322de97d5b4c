//! Test doubles for the three collaborator interfaces.
//!
//! All mocks are shared through `Arc` so a test keeps a handle to the same
//! instance the [`DigitalIo`] under test owns.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use carver_hal::board::carver_controller;
use carver_hal::{
    ControlSignals, EdgeMode, GpioPort, PinAddress, PinDriver, Realtime, SettingsStore,
};

use crate::io::DigitalIo;

/// Aux input 0 on the reference board.
pub const IN0: PinAddress = PinAddress::new(GpioPort::C, 14);
/// Aux input 1 (control-tied to the safety door).
pub const IN1: PinAddress = PinAddress::new(GpioPort::C, 13);
/// Aux input 2 (no edge capability).
pub const IN2: PinAddress = PinAddress::new(GpioPort::A, 15);
/// Aux outputs 0-3.
pub const OUT0: PinAddress = PinAddress::new(GpioPort::B, 13);
pub const OUT1: PinAddress = PinAddress::new(GpioPort::B, 14);
pub const OUT2: PinAddress = PinAddress::new(GpioPort::B, 12);

/// Recording pin driver.
#[derive(Default)]
pub struct MockPins {
    levels: Mutex<HashMap<PinAddress, bool>>,
    writes: Mutex<Vec<(PinAddress, bool)>>,
    armed: Mutex<HashMap<PinAddress, EdgeMode>>,
}

impl MockPins {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Forces the simulated electrical level of a pin.
    pub fn set_level(&self, addr: PinAddress, high: bool) {
        self.levels.lock().unwrap().insert(addr, high);
    }

    pub fn level(&self, addr: PinAddress) -> bool {
        self.levels.lock().unwrap().get(&addr).copied().unwrap_or(false)
    }

    /// Number of writes ever issued to a pin.
    pub fn write_count(&self, addr: PinAddress) -> usize {
        self.writes.lock().unwrap().iter().filter(|(a, _)| *a == addr).count()
    }

    /// Currently armed edge mode (empty when disabled or never armed).
    pub fn armed(&self, addr: PinAddress) -> EdgeMode {
        self.armed
            .lock()
            .unwrap()
            .get(&addr)
            .copied()
            .unwrap_or(EdgeMode::empty())
    }
}

impl PinDriver for MockPins {
    fn read_pin(&self, addr: PinAddress) -> bool {
        self.level(addr)
    }

    fn write_pin(&self, addr: PinAddress, high: bool) {
        self.levels.lock().unwrap().insert(addr, high);
        self.writes.lock().unwrap().push((addr, high));
    }

    fn set_edge_detection(&self, addr: PinAddress, mode: EdgeMode) {
        self.armed.lock().unwrap().insert(addr, mode);
    }

    fn disable_edge_detection(&self, addr: PinAddress) {
        self.armed.lock().unwrap().insert(addr, EdgeMode::empty());
    }
}

/// Counting realtime service; sleeps 1 ms per quantum to keep tests quick.
#[derive(Default)]
pub struct MockRealtime {
    polls: AtomicU32,
    abort: AtomicBool,
}

impl MockRealtime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }
}

impl Realtime for MockRealtime {
    fn poll_realtime(&self) {
        self.polls.fetch_add(1, Ordering::SeqCst);
    }

    fn delay_ms(&self, _ms: u32) {
        thread::sleep(Duration::from_millis(1));
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }
}

/// In-memory settings store.
#[derive(Default)]
pub struct MockSettings {
    invert_in: AtomicU32,
    invert_out: AtomicU32,
    control_invert: AtomicU16,
    commits: AtomicU32,
}

impl MockSettings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Simulates an external edit of the output-inversion mask. The trait
    /// deliberately has no setter for it; only users edit that mask.
    pub fn force_invert_out(&self, mask: u32) {
        self.invert_out.store(mask, Ordering::SeqCst);
    }

    pub fn commit_count(&self) -> u32 {
        self.commits.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MockSettings {
    fn invert_in(&self) -> u32 {
        self.invert_in.load(Ordering::SeqCst)
    }

    fn set_invert_in(&self, mask: u32) {
        self.invert_in.store(mask, Ordering::SeqCst);
    }

    fn invert_out(&self) -> u32 {
        self.invert_out.load(Ordering::SeqCst)
    }

    fn control_invert(&self) -> ControlSignals {
        ControlSignals::from_bits_truncate(self.control_invert.load(Ordering::SeqCst))
    }

    fn set_control_invert(&self, mask: ControlSignals) {
        self.control_invert.store(mask.bits(), Ordering::SeqCst);
    }

    fn commit(&self) {
        self.commits.fetch_add(1, Ordering::SeqCst);
    }
}

/// A [`DigitalIo`] over the reference board with all three mocks.
pub type TestIo = DigitalIo<Arc<MockPins>, Arc<MockRealtime>, Arc<MockSettings>>;

/// Builds a fresh table over the reference board map.
pub fn test_io() -> (TestIo, Arc<MockPins>, Arc<MockRealtime>, Arc<MockSettings>) {
    let pins = MockPins::new();
    let rt = MockRealtime::new();
    let settings = MockSettings::new();
    let io = DigitalIo::new(
        pins.clone(),
        rt.clone(),
        settings.clone(),
        carver_controller::AUX_IN,
        carver_controller::AUX_OUT,
    )
    .unwrap();
    (io, pins, rt, settings)
}
