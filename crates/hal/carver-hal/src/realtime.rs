//! Cooperative realtime service interface.
//!
//! The firmware has no preemptive scheduler: a single main context runs the
//! event loop, and anything that blocks must hand control back to it. Code
//! that waits calls [`Realtime::poll_realtime`] on every retry so pending
//! realtime work (status reports, overrides, abort) keeps being serviced.

/// Services a blocking caller must yield to while waiting.
pub trait Realtime {
    /// Runs one pass of the firmware's main event-processing function.
    fn poll_realtime(&self);

    /// Sleeps for `ms` milliseconds.
    fn delay_ms(&self, ms: u32);

    /// Whether a global abort has been requested.
    ///
    /// Checked once per retry quantum; an abort unwinds any in-progress wait.
    fn aborted(&self) -> bool;
}

#[cfg(feature = "alloc")]
impl<T: Realtime + ?Sized> Realtime for alloc::sync::Arc<T> {
    fn poll_realtime(&self) {
        (**self).poll_realtime();
    }

    fn delay_ms(&self, ms: u32) {
        (**self).delay_ms(ms);
    }

    fn aborted(&self) -> bool {
        (**self).aborted()
    }
}
