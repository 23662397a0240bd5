use std::sync::atomic::{AtomicBool, Ordering};

/// Per-form flag admitting one pending submission at a time.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    /// Claims the flag, or returns `None` if a submission is already pending.
    pub(crate) fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop, including when the submission future is cancelled.
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
