/// A running repeating timer that can be cancelled.
pub trait TimerHandle {
    fn cancel(self);
}

/// Slot that keeps at most one repeating timer alive.
///
/// Starting a new timer cancels the previous one so a reset never leaves two
/// callbacks writing the elapsed counter. Dropping the slot cancels the timer.
pub struct Ticker<H: TimerHandle> {
    active: Option<H>,
    starts: u64,
}

impl<H: TimerHandle> Ticker<H> {
    pub fn new() -> Self {
        Self {
            active: None,
            starts: 0,
        }
    }

    pub fn start(&mut self, handle: H) {
        self.stop();
        self.starts += 1;
        self.active = Some(handle);
        log::debug!("ticker started (generation {})", self.starts);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Number of timers started over the slot's lifetime.
    pub fn generation(&self) -> u64 {
        self.starts
    }
}

impl<H: TimerHandle> Default for Ticker<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TimerHandle> Drop for Ticker<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
